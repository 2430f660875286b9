//! Core data types for the simulation.
//!
//! This module defines the lesson state machine vocabulary shared by the
//! classroom and the journal, and the per-actor records handed to the
//! reporter once every actor thread has returned.

pub mod lesson;
pub mod record;

pub use lesson::{LessonEvent, LessonState, StartBasis, Transition};
pub use record::{StudentDeparture, StudentRecord, TeacherDeparture, TeacherRecord};
