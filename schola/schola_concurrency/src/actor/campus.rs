//! State shared by every actor of a run.

use crossbeam_channel::Sender;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use schola_core::error::SyncError;
use schola_core::id::{ClassroomId, StudentId};
use schola_core::traits::LessonPacer;
use schola_core::types::LessonEvent;
use schola_core::SimulationConfig;

use crate::classroom::{Classroom, Enrollment};
use crate::sync::{AbortSignal, Eligibility, PopulationTracker};

/// Classrooms, population tracker, abort signal and pacing of one run.
pub struct Campus {
    classrooms: Vec<Classroom>,
    tracker: PopulationTracker,
    abort: AbortSignal,
    pacer: Arc<dyn LessonPacer>,
    quorum: usize,
    required_lessons: u32,
    wait_timeout: Duration,
}

impl Campus {
    /// Build the classrooms and tracker for `config`. Every classroom
    /// transition is sent to `journal`.
    pub fn new(
        config: &SimulationConfig,
        pacer: Arc<dyn LessonPacer>,
        journal: Sender<LessonEvent>,
    ) -> Self {
        let classrooms = ClassroomId::range(config.classrooms)
            .map(|id| Classroom::new(id, config.quorum).with_journal(journal.clone()))
            .collect();
        Self {
            classrooms,
            tracker: PopulationTracker::from_config(config),
            abort: AbortSignal::new(),
            pacer,
            quorum: config.quorum,
            required_lessons: config.required_lessons,
            wait_timeout: config.wait_timeout(),
        }
    }

    /// Look up a classroom.
    pub fn classroom(&self, id: ClassroomId) -> Result<&Classroom, SyncError> {
        self.classrooms
            .get(id.index())
            .ok_or_else(|| SyncError::UnknownActor(id.to_string()))
    }

    /// Every classroom, in index order.
    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }

    /// The population tracker.
    pub fn tracker(&self) -> &PopulationTracker {
        &self.tracker
    }

    /// The run-wide abort signal.
    pub fn abort(&self) -> &AbortSignal {
        &self.abort
    }

    /// Lesson and recess delays.
    pub fn pacer(&self) -> &dyn LessonPacer {
        self.pacer.as_ref()
    }

    /// Enrolled students needed for a regular start.
    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Lessons every actor must complete.
    pub fn required_lessons(&self) -> u32 {
        self.required_lessons
    }

    /// Bound on every blocking wait.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Eligible population for `classroom`, with the students held by other
    /// classrooms' under-quorum intakes counted as contested.
    ///
    /// Classroom locks are taken one at a time and released before the
    /// tracker lock is taken.
    pub fn eligibility(&self, classroom: ClassroomId) -> Eligibility {
        let contested: HashSet<_> = self
            .classrooms
            .iter()
            .filter(|other| other.id() != classroom)
            .flat_map(|other| other.held_below_quorum())
            .collect();
        self.tracker.eligibility(classroom, &contested)
    }

    /// Enroll `student` in `classroom`.
    ///
    /// A student that joins an intake still below quorum becomes contested
    /// for every other classroom, so their teachers are nudged to
    /// re-evaluate a fallback start.
    pub fn enroll(
        &self,
        classroom: &Classroom,
        student: StudentId,
        history: &[ClassroomId],
    ) -> Enrollment {
        let enrollment = classroom.enroll(student, history);
        if matches!(enrollment, Enrollment::Joined { .. })
            && classroom.enrolled_count() < self.quorum
        {
            for other in self.classrooms.iter().filter(|c| c.id() != classroom.id()) {
                other.nudge();
            }
        }
        enrollment
    }

    /// Wake every teacher waiting on its intake.
    pub fn nudge_classrooms(&self) {
        for classroom in &self.classrooms {
            classroom.nudge();
        }
    }

    /// Raise the abort signal and wake everyone who can be woken.
    ///
    /// Returns true if this call raised the signal.
    pub fn abort_run(&self) -> bool {
        let raised = self.abort.raise();
        if raised {
            self.nudge_classrooms();
            self.tracker.notify_change();
        }
        raised
    }
}

impl std::fmt::Debug for Campus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Campus")
            .field("classrooms", &self.classrooms)
            .field("tracker", &self.tracker)
            .field("aborted", &self.abort.is_raised())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use schola_core::id::{StudentId, TeacherId};
    use schola_core::FixedPacer;

    fn campus() -> Campus {
        let config = SimulationConfig {
            classrooms: 3,
            students_per_classroom: 2,
            quorum: 4,
            required_lessons: 2,
            ..SimulationConfig::default()
        };
        let (tx, _rx) = unbounded();
        Campus::new(&config, Arc::new(FixedPacer::instant()), tx)
    }

    #[test]
    fn test_campus_layout() {
        let campus = campus();
        assert_eq!(campus.classrooms().len(), 3);
        assert_eq!(campus.tracker().snapshot().students_remaining, 6);
        assert_eq!(campus.quorum(), 4);
        assert!(campus.classroom(ClassroomId::from_index(2)).is_ok());
        assert!(matches!(
            campus.classroom(ClassroomId::from_index(3)),
            Err(SyncError::UnknownActor(_))
        ));
    }

    #[test]
    fn test_students_held_elsewhere_are_contested() {
        let campus = campus();
        let other = campus.classroom(ClassroomId::from_index(1)).unwrap();
        other.claim(TeacherId::from_index(1)).unwrap();
        other.enroll(StudentId::from_index(0), &[]);
        other.enroll(StudentId::from_index(1), &[]);

        let eligibility = campus.eligibility(ClassroomId::from_index(0));
        assert_eq!(eligibility.eligible, 6);
        assert_eq!(eligibility.contested, 2);
        assert_eq!(eligibility.reachable(), 4);

        // members of the classroom itself are never contested
        let own = campus.eligibility(ClassroomId::from_index(1));
        assert_eq!(own.contested, 0);
    }

    #[test]
    fn test_below_quorum_enrollment_nudges_other_classrooms() {
        let campus = campus();
        let first = campus.classroom(ClassroomId::from_index(0)).unwrap();
        let second = campus.classroom(ClassroomId::from_index(1)).unwrap();
        first.claim(TeacherId::from_index(0)).unwrap();
        second.claim(TeacherId::from_index(1)).unwrap();

        let seen_first = first.intake_revision();
        let seen_other = campus.classrooms()[2].intake_revision();
        let joined = campus.enroll(second, StudentId::from_index(0), &[]);
        assert!(matches!(joined, Enrollment::Joined { .. }));
        assert_eq!(first.intake_revision(), seen_first + 1);
        assert_eq!(campus.classrooms()[2].intake_revision(), seen_other + 1);

        // a refusal changes nothing anywhere
        let seen_first = first.intake_revision();
        let refused = campus.enroll(second, StudentId::from_index(0), &[]);
        assert!(matches!(refused, Enrollment::Refused(_)));
        assert_eq!(first.intake_revision(), seen_first);
    }

    #[test]
    fn test_enrollment_at_quorum_does_not_nudge() {
        let campus = campus();
        let first = campus.classroom(ClassroomId::from_index(0)).unwrap();
        let second = campus.classroom(ClassroomId::from_index(1)).unwrap();
        first.claim(TeacherId::from_index(0)).unwrap();
        second.claim(TeacherId::from_index(1)).unwrap();
        for index in 0..3 {
            campus.enroll(second, StudentId::from_index(index), &[]);
        }

        let seen = first.intake_revision();
        campus.enroll(second, StudentId::from_index(3), &[]);
        assert_eq!(first.intake_revision(), seen);
    }

    #[test]
    fn test_abort_run_raises_once() {
        let campus = campus();
        assert!(campus.abort_run());
        assert!(!campus.abort_run());
        assert!(campus.abort().check().is_err());
    }
}
