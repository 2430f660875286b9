//! Population tracker.
//!
//! Shared counters of the students and teachers still in the school, the
//! attendance standing of every student, and a change signal. Everything
//! lives under one lock. Each mutation bumps a generation counter and wakes
//! every waiter, so a waiter that remembers the generation it last saw can
//! never miss a change that happened between its check and its wait.

use log::{debug, trace};
use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;
use std::time::Duration;

use schola_core::error::SyncError;
use schola_core::id::{ClassroomId, StudentId, TeacherId};
use schola_core::SimulationConfig;

/// Result of a bounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Woken by a change, or the change had already happened.
    Changed,

    /// The wait bound elapsed first.
    TimedOut,
}

/// Counters observed together under the tracker lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationSnapshot {
    /// Students still in the school
    pub students_remaining: usize,

    /// Teachers still in the school
    pub teachers_remaining: usize,

    /// Generation at the time of the snapshot
    pub generation: u64,
}

/// Eligible population for one classroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Students in the school with lessons left that never attended the classroom
    pub eligible: usize,

    /// Those of them currently held by another classroom's under-quorum intake
    pub contested: usize,
}

impl Eligibility {
    /// Eligible students not held elsewhere.
    pub fn reachable(&self) -> usize {
        self.eligible.saturating_sub(self.contested)
    }
}

/// What the tracker knows about one student.
#[derive(Debug, Clone, Default)]
struct Standing {
    present: bool,
    lessons_attended: u32,
    visited: Vec<ClassroomId>,
}

#[derive(Debug)]
struct Population {
    students_remaining: usize,
    teachers_remaining: usize,
    students: Vec<Standing>,
    teachers_present: Vec<bool>,
    generation: u64,
}

impl Population {
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Shared population counters with a change signal.
pub struct PopulationTracker {
    required_lessons: u32,
    inner: Mutex<Population>,
    changed: Condvar,
}

impl PopulationTracker {
    /// Create a tracker for a full population.
    pub fn new(students: usize, teachers: usize, required_lessons: u32) -> Self {
        let standing = Standing {
            present: true,
            ..Standing::default()
        };
        Self {
            required_lessons,
            inner: Mutex::new(Population {
                students_remaining: students,
                teachers_remaining: teachers,
                students: vec![standing; students],
                teachers_present: vec![true; teachers],
                generation: 0,
            }),
            changed: Condvar::new(),
        }
    }

    /// Create a tracker sized by a configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.total_students(),
            config.teachers(),
            config.required_lessons,
        )
    }

    /// Read both counters and the generation atomically.
    pub fn snapshot(&self) -> PopulationSnapshot {
        let population = self.inner.lock();
        PopulationSnapshot {
            students_remaining: population.students_remaining,
            teachers_remaining: population.teachers_remaining,
            generation: population.generation,
        }
    }

    /// Record that a student left the school. Returns the students remaining.
    pub fn decrement_students(&self, student: StudentId) -> Result<usize, SyncError> {
        let mut population = self.inner.lock();
        let standing = population
            .students
            .get_mut(student.index())
            .ok_or_else(|| SyncError::UnknownActor(student.to_string()))?;
        if !standing.present {
            return Err(SyncError::DuplicateStudentDeparture(student));
        }
        standing.present = false;
        population.students_remaining -= 1;
        population.bump();
        let remaining = population.students_remaining;
        self.changed.notify_all();

        debug!("{} left; students remaining: {}", student, remaining);
        Ok(remaining)
    }

    /// Record that a teacher left the school. Returns the teachers remaining.
    pub fn decrement_teachers(&self, teacher: TeacherId) -> Result<usize, SyncError> {
        let mut population = self.inner.lock();
        let present = population
            .teachers_present
            .get_mut(teacher.index())
            .ok_or_else(|| SyncError::UnknownActor(teacher.to_string()))?;
        if !*present {
            return Err(SyncError::DuplicateTeacherDeparture(teacher));
        }
        *present = false;
        population.teachers_remaining -= 1;
        population.bump();
        let remaining = population.teachers_remaining;
        self.changed.notify_all();

        debug!("{} left; teachers remaining: {}", teacher, remaining);
        Ok(remaining)
    }

    /// Record a lesson the student attended.
    pub fn record_attendance(
        &self,
        student: StudentId,
        classroom: ClassroomId,
    ) -> Result<(), SyncError> {
        let mut population = self.inner.lock();
        let standing = population
            .students
            .get_mut(student.index())
            .ok_or_else(|| SyncError::UnknownActor(student.to_string()))?;
        standing.lessons_attended += 1;
        standing.visited.push(classroom);
        population.bump();
        self.changed.notify_all();
        Ok(())
    }

    /// Count the students that could still attend `classroom`: present,
    /// with lessons left, and never having attended it.
    pub fn eligible_for(&self, classroom: ClassroomId) -> usize {
        self.eligibility(classroom, &HashSet::new()).eligible
    }

    /// Eligible population for `classroom`, separating out the `contested`
    /// students currently held by another classroom.
    pub fn eligibility(
        &self,
        classroom: ClassroomId,
        contested: &HashSet<StudentId>,
    ) -> Eligibility {
        let population = self.inner.lock();
        let mut eligibility = Eligibility {
            eligible: 0,
            contested: 0,
        };
        for (index, standing) in population.students.iter().enumerate() {
            if standing.present
                && standing.lessons_attended < self.required_lessons
                && !standing.visited.contains(&classroom)
            {
                eligibility.eligible += 1;
                if contested.contains(&StudentId::from_index(index)) {
                    eligibility.contested += 1;
                }
            }
        }
        trace!(
            "{}: {} eligible, {} contested",
            classroom,
            eligibility.eligible,
            eligibility.contested
        );
        eligibility
    }

    /// Wake every waiter without changing any counter.
    ///
    /// Used when a classroom opens its intake, which may unblock scanning
    /// students.
    pub fn notify_change(&self) {
        let mut population = self.inner.lock();
        population.bump();
        self.changed.notify_all();
    }

    /// Wait until the generation differs from `seen`, or `timeout` elapses.
    pub fn wait_for_change(&self, seen: u64, timeout: Duration) -> WaitOutcome {
        let mut population = self.inner.lock();
        if population.generation != seen {
            return WaitOutcome::Changed;
        }
        let result = self.changed.wait_for(&mut population, timeout);
        if population.generation != seen {
            WaitOutcome::Changed
        } else if result.timed_out() {
            WaitOutcome::TimedOut
        } else {
            // Spurious wakeup; the caller re-checks its predicate either way.
            WaitOutcome::Changed
        }
    }
}

impl std::fmt::Debug for PopulationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("PopulationTracker")
            .field("students_remaining", &snapshot.students_remaining)
            .field("teachers_remaining", &snapshot.teachers_remaining)
            .field("generation", &snapshot.generation)
            .finish()
    }
}
