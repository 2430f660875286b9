#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Schola Concurrency
//!
//! The classroom rendezvous protocol: shared state machines that let many
//! student threads join one teacher's classroom, gate lesson starts on a
//! quorum, degrade gracefully when the quorum becomes unreachable, and
//! reset cleanly between lesson cycles.
//!
//! - **classroom**: one lock-guarded state machine per classroom
//! - **sync**: the population tracker and the run-wide abort signal
//! - **actor**: teacher and student protocols, and the `School` driver
//! - **journal**: the ordered record of classroom transitions and its audit
//!
//! ## Locking
//!
//! Every classroom has its own lock; the population tracker has a single
//! global one. No code path holds a classroom lock and the tracker lock at
//! the same time. Every blocking wait is bounded and re-checks its
//! predicate after waking, whether it was signaled or timed out.

/// Teacher and student threads and the driver that runs them
pub mod actor;

/// Classroom state machines
pub mod classroom;

/// Transition journal and its audit
pub mod journal;

/// Population tracking and run-wide abort
pub mod sync;

// Re-export key types for easier access
pub use actor::{Actor, Campus, RunOutcome, School, Student, Teacher};
pub use classroom::{Classroom, ClassroomSnapshot, Enrollment, LessonStart, Refusal};
pub use journal::{Journal, JournalStats};
pub use sync::{AbortSignal, Eligibility, PopulationSnapshot, PopulationTracker, WaitOutcome};
