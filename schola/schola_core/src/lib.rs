//! # Schola Core
//!
//! `schola_core` provides the fundamental building blocks for the schola
//! classroom rendezvous simulation: identifiers, the lesson data model,
//! error types, configuration and the post-run reporter.
//!
//! ## Model
//!
//! A fixed population of teachers and students meets in shared classrooms.
//! Every teacher is permanently bound to one classroom and drives it through
//! lesson cycles:
//!
//! ```text
//! Waiting --start_lesson--> InProgress --end_lesson--> Ended --reset--> Waiting
//! ```
//!
//! Students join classrooms that are `Waiting` with a bound teacher, never
//! visiting the same classroom twice. A lesson starts once a quorum has
//! enrolled, or earlier when the quorum has become unreachable.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all schola components
//! - **id**: Strongly-typed identifiers for students, teachers and classrooms
//! - **report**: Summaries computed from final actor records
//! - **traits**: Seams injected into the actors (lesson pacing)
//! - **types**: Lesson states, transitions and actor records
//! - **utils**: Configuration and logging helpers

pub mod error;
pub mod id;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export key types and traits for convenience
pub use error::{Error, Result};
pub use id::{ClassroomId, StudentId, TeacherId};
pub use report::RunSummary;
pub use traits::{FixedPacer, LessonPacer};
pub use types::{
    LessonEvent, LessonState, StartBasis, StudentDeparture, StudentRecord, TeacherDeparture,
    TeacherRecord, Transition,
};
pub use utils::{LogLevel, SimulationConfig};
