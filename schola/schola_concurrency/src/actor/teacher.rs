//! Teacher protocol.
//!
//! A teacher is permanently bound to the classroom with its own index. For
//! each required lesson it claims the classroom, waits for a quorum or for
//! the quorum to become unreachable, teaches, and resets the classroom.

use log::{debug, info, trace, warn};
use std::sync::Arc;

use schola_core::id::TeacherId;
use schola_core::types::{StartBasis, TeacherDeparture, TeacherRecord};
use schola_core::Result;

use super::{Actor, Campus};
use crate::classroom::{Classroom, LessonStart};

/// A teacher thread's state.
pub struct Teacher {
    id: TeacherId,
    campus: Arc<Campus>,
    record: TeacherRecord,
}

impl Teacher {
    /// Create a teacher that has not arrived yet.
    pub fn new(id: TeacherId, campus: Arc<Campus>) -> Self {
        Self {
            id,
            campus,
            record: TeacherRecord::new(id),
        }
    }

    /// Wait until the lesson can start and start it.
    ///
    /// Returns `None` if the classroom was closed because nobody could ever
    /// join it again.
    fn open_lesson(&self, classroom: &Classroom) -> Result<Option<LessonStart>> {
        let quorum = self.campus.quorum();
        loop {
            self.campus.abort().check()?;

            let seen = classroom.intake_revision();
            let enrolled = classroom.enrolled_count();
            if enrolled >= quorum {
                return Ok(Some(classroom.start_lesson(self.id, StartBasis::Quorum)?));
            }

            let eligibility = self.campus.eligibility(classroom.id());
            if enrolled == 0 && eligibility.eligible == 0 {
                if classroom.close(self.id)? {
                    return Ok(None);
                }
                continue;
            }
            if enrolled > 0 && eligibility.reachable() < quorum {
                let basis = StartBasis::Fallback {
                    eligible: eligibility.eligible,
                    contested: eligibility.contested,
                };
                return Ok(Some(classroom.start_lesson(self.id, basis)?));
            }

            trace!(
                "{} waiting for students. Current count: {}",
                self.id,
                enrolled
            );
            classroom.wait_for_intake(seen, self.campus.wait_timeout());
        }
    }
}

impl Actor for Teacher {
    type Record = TeacherRecord;

    fn name(&self) -> String {
        self.id.to_string()
    }

    fn run(mut self) -> Result<TeacherRecord> {
        info!("{} has arrived at school", self.id);
        let campus = Arc::clone(&self.campus);
        let classroom = campus.classroom(self.id.classroom())?;
        let required = campus.required_lessons();

        while self.record.lessons_taught < required {
            campus.abort().check()?;

            let cycle = classroom.claim(self.id)?;
            campus.tracker().notify_change();
            debug!(
                "{} preparing for lesson {} in {} (cycle {})",
                self.id,
                self.record.lessons_taught + 1,
                classroom.id(),
                cycle
            );

            let start = match self.open_lesson(classroom)? {
                Some(start) => start,
                None => {
                    warn!(
                        "{} dismissed after {}/{} lessons: no student can join {}",
                        self.id,
                        self.record.lessons_taught,
                        required,
                        classroom.id()
                    );
                    self.record.departure = TeacherDeparture::Dismissed;
                    break;
                }
            };

            campus.pacer().hold_lesson(classroom.id());
            classroom.end_lesson(self.id)?;
            self.record.teach(classroom.id(), start.basis.is_degraded());

            campus.pacer().recess(self.id);
            classroom.reset(self.id)?;
            campus.tracker().notify_change();
        }

        let remaining = campus.tracker().decrement_teachers(self.id)?;
        info!(
            "{} is leaving ({}). Teachers remaining: {}",
            self.id, self.record.departure, remaining
        );
        Ok(self.record)
    }
}
