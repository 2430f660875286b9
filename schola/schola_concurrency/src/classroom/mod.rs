//! Classroom state machines.
//!
//! A classroom moves through `Waiting -> InProgress -> Ended` once per
//! lesson cycle, and back to `Waiting` on reset. Only the bound teacher
//! drives transitions; students only enroll and wait.

mod room;

pub use room::{Classroom, ClassroomSnapshot, Enrollment, LessonStart, Refusal};
