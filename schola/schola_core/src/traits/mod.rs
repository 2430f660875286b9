//! Seams injected into the actors.
//!
//! - `LessonPacer`: how long a lesson and the break after it take

pub mod pacing;

pub use pacing::{FixedPacer, LessonPacer};
