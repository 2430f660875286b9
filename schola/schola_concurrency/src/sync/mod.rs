//! Synchronization primitives shared by every actor.
//!
//! - `PopulationTracker`: who is still in the school, who may still join
//!   which classroom, and the change signal that wakes scanning students
//! - `AbortSignal`: run-wide flag raised when any actor fails

pub mod abort;
pub mod tracker;

pub use abort::AbortSignal;
pub use tracker::{Eligibility, PopulationSnapshot, PopulationTracker, WaitOutcome};
