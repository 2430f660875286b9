//! Lesson pacing.
//!
//! The length of a lesson is an external delay, not part of the rendezvous
//! protocol. Teachers call into a `LessonPacer` between starting and ending
//! a lesson, and again before resetting their classroom.

use std::thread;
use std::time::Duration;

use crate::id::{ClassroomId, TeacherId};
use crate::utils::SimulationConfig;

/// Source of the delays a teacher observes during a lesson cycle.
///
/// # Examples
///
/// ```
/// use schola_core::id::{ClassroomId, TeacherId};
/// use schola_core::traits::LessonPacer;
///
/// struct Instant;
///
/// impl LessonPacer for Instant {
///     fn hold_lesson(&self, _classroom: ClassroomId) {}
///     fn recess(&self, _teacher: TeacherId) {}
/// }
///
/// Instant.hold_lesson(ClassroomId::from_index(0));
/// ```
pub trait LessonPacer: Send + Sync {
    /// Block for the duration of a lesson in `classroom`.
    fn hold_lesson(&self, classroom: ClassroomId);

    /// Block for the break a teacher takes between ending and resetting.
    fn recess(&self, teacher: TeacherId);
}

/// A pacer that sleeps for fixed durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPacer {
    lesson: Duration,
    recess: Duration,
}

impl FixedPacer {
    /// Create a pacer with explicit durations.
    pub fn new(lesson: Duration, recess: Duration) -> Self {
        Self { lesson, recess }
    }

    /// A pacer that never sleeps.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// A pacer using the configured lesson and recess durations.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.lesson_duration(), config.recess())
    }

    /// Configured lesson duration.
    pub fn lesson(&self) -> Duration {
        self.lesson
    }

    /// Configured recess duration.
    pub fn recess_duration(&self) -> Duration {
        self.recess
    }
}

impl LessonPacer for FixedPacer {
    fn hold_lesson(&self, _classroom: ClassroomId) {
        if !self.lesson.is_zero() {
            thread::sleep(self.lesson);
        }
    }

    fn recess(&self, _teacher: TeacherId) {
        if !self.recess.is_zero() {
            thread::sleep(self.recess);
        }
    }
}
