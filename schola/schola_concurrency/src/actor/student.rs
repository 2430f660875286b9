//! Student protocol.
//!
//! A student scans the classrooms for an open intake, attends the lesson
//! it joined, and repeats until it has its required lessons or no teacher
//! remains in the school.

use log::{debug, info, trace, warn};
use std::sync::Arc;

use schola_core::id::StudentId;
use schola_core::types::{StudentDeparture, StudentRecord};
use schola_core::Result;

use super::{Actor, Campus};
use crate::classroom::{Classroom, Enrollment};

/// A student thread's state.
pub struct Student {
    id: StudentId,
    campus: Arc<Campus>,
    record: StudentRecord,
}

impl Student {
    /// Create a student that has not arrived yet.
    pub fn new(id: StudentId, campus: Arc<Campus>) -> Self {
        Self {
            id,
            campus,
            record: StudentRecord::new(id),
        }
    }

    /// Try each classroom once, starting at an offset derived from the
    /// student's index so that students spread across classrooms.
    fn find_classroom<'a>(&self, campus: &'a Campus) -> Option<(&'a Classroom, u32)> {
        let classrooms = campus.classrooms();
        let count = classrooms.len();
        let first = self.id.index() % count.max(1);

        for offset in 0..count {
            let classroom = &classrooms[(first + offset) % count];
            if self.record.has_attended(classroom.id()) {
                continue;
            }
            if let Enrollment::Joined {
                cycle,
                quorum_reached,
            } = campus.enroll(classroom, self.id, &self.record.history)
            {
                if quorum_reached {
                    debug!("{} brought {} to quorum", self.id, classroom.id());
                }
                return Some((classroom, cycle));
            }
        }
        None
    }

    /// Sit through the lesson of `cycle` and record it.
    fn attend(&mut self, campus: &Campus, classroom: &Classroom, cycle: u32) -> Result<()> {
        trace!(
            "{} waiting for lesson to start in {}",
            self.id,
            classroom.id()
        );
        classroom.await_start(cycle, campus.wait_timeout(), campus.abort())?;
        trace!(
            "{} participating in lesson in {}",
            self.id,
            classroom.id()
        );
        classroom.await_end(cycle, campus.wait_timeout(), campus.abort())?;

        self.record.attend(classroom.id());
        campus.tracker().record_attendance(self.id, classroom.id())?;
        debug!(
            "{} completed lesson in {}. Lessons attended: {}/{}",
            self.id,
            classroom.id(),
            self.record.lessons_attended,
            campus.required_lessons()
        );
        Ok(())
    }
}

impl Actor for Student {
    type Record = StudentRecord;

    fn name(&self) -> String {
        self.id.to_string()
    }

    fn run(mut self) -> Result<StudentRecord> {
        info!("{} has arrived at school", self.id);
        let campus = Arc::clone(&self.campus);
        let required = campus.required_lessons();

        while self.record.lessons_attended < required {
            campus.abort().check()?;

            let snapshot = campus.tracker().snapshot();
            if snapshot.teachers_remaining == 0 {
                warn!(
                    "{} is leaving because no teachers remain. Lessons attended: {}/{}",
                    self.id, self.record.lessons_attended, required
                );
                break;
            }

            match self.find_classroom(&campus) {
                Some((classroom, cycle)) => self.attend(&campus, classroom, cycle)?,
                None => {
                    trace!("{} couldn't find an available classroom. Waiting", self.id);
                    campus
                        .tracker()
                        .wait_for_change(snapshot.generation, campus.wait_timeout());
                }
            }
        }

        if self.record.lessons_attended >= required {
            self.record.departure = StudentDeparture::Completed;
        }
        let remaining = campus.tracker().decrement_students(self.id)?;
        campus.nudge_classrooms();
        info!(
            "{} is leaving ({}). Students remaining: {}",
            self.id, self.record.departure, remaining
        );
        Ok(self.record)
    }
}
