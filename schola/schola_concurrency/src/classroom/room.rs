//! A single classroom.
//!
//! State and membership sit behind one lock per classroom. Three condition
//! variables hang off that lock:
//!
//! - `intake`: the teacher waits here for enrollments (or a nudge)
//! - `started`: enrolled students wait here for the lesson to start
//! - `ended`: attending students wait here for the lesson to end
//!
//! Every state write and its wakeup happen under the lock, so no thread can
//! observe a new state without also being wakeable by it.

use crossbeam_channel::Sender;
use log::{debug, trace, warn};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::HashSet;
use std::time::Duration;

use schola_core::error::{ProtocolError, SyncError};
use schola_core::id::{ClassroomId, StudentId, TeacherId};
use schola_core::types::{LessonEvent, LessonState, StartBasis, Transition};

use crate::sync::{AbortSignal, WaitOutcome};

/// Outcome of an enrollment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrollment {
    /// The student joined the current cycle.
    Joined {
        /// Cycle joined
        cycle: u32,

        /// Whether this enrollment brought the classroom to its quorum
        quorum_reached: bool,
    },

    /// Nothing changed; the student has to look elsewhere.
    Refused(Refusal),
}

/// Why an enrollment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No teacher is bound.
    Unclaimed,

    /// Intake is closed.
    Closed(LessonState),

    /// The student is already a member of this cycle.
    AlreadyMember,

    /// The student attended this classroom before.
    AlreadyAttended,
}

/// A started lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonStart {
    /// Cycle started
    pub cycle: u32,

    /// Students enrolled at the start
    pub enrolled: usize,

    /// Quorum or fallback
    pub basis: StartBasis,
}

/// Point-in-time view of a classroom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomSnapshot {
    /// Classroom
    pub id: ClassroomId,

    /// Current state
    pub state: LessonState,

    /// Bound teacher, if any
    pub teacher: Option<TeacherId>,

    /// Members of the current cycle
    pub enrolled: usize,

    /// Current cycle
    pub cycle: u32,
}

#[derive(Debug)]
struct Room {
    lesson: LessonState,
    teacher: Option<TeacherId>,
    members: HashSet<StudentId>,
    cycle: u32,
    // bumped on every enrollment and nudge
    revision: u64,
}

impl Room {
    fn has_started(&self, cycle: u32) -> bool {
        self.cycle > cycle || self.lesson != LessonState::Waiting
    }

    fn has_ended(&self, cycle: u32) -> bool {
        self.cycle > cycle || self.lesson == LessonState::Ended
    }
}

/// One classroom and its lesson cycle.
pub struct Classroom {
    id: ClassroomId,
    quorum: usize,
    room: Mutex<Room>,
    intake: Condvar,
    started: Condvar,
    ended: Condvar,
    journal: Option<Sender<LessonEvent>>,
}

impl Classroom {
    /// Create an unbound classroom in `Waiting`.
    pub fn new(id: ClassroomId, quorum: usize) -> Self {
        Self {
            id,
            quorum,
            room: Mutex::new(Room {
                lesson: LessonState::Waiting,
                teacher: None,
                members: HashSet::new(),
                cycle: 0,
                revision: 0,
            }),
            intake: Condvar::new(),
            started: Condvar::new(),
            ended: Condvar::new(),
            journal: None,
        }
    }

    /// Send every transition to `journal`.
    pub fn with_journal(mut self, journal: Sender<LessonEvent>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// This classroom's identifier.
    pub fn id(&self) -> ClassroomId {
        self.id
    }

    /// Enrolled students needed for a regular start.
    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Current state, binding and membership.
    pub fn snapshot(&self) -> ClassroomSnapshot {
        let room = self.room.lock();
        ClassroomSnapshot {
            id: self.id,
            state: room.lesson,
            teacher: room.teacher,
            enrolled: room.members.len(),
            cycle: room.cycle,
        }
    }

    /// Members of the current cycle.
    pub fn enrolled_count(&self) -> usize {
        self.room.lock().members.len()
    }

    /// Members of the current cycle, in no particular order.
    pub fn members(&self) -> Vec<StudentId> {
        self.room.lock().members.iter().copied().collect()
    }

    /// Members held by this classroom's intake while it is still below
    /// quorum. Empty in every other state.
    pub fn held_below_quorum(&self) -> Vec<StudentId> {
        let room = self.room.lock();
        if room.lesson == LessonState::Waiting
            && room.teacher.is_some()
            && room.members.len() < self.quorum
        {
            room.members.iter().copied().collect()
        } else {
            Vec::new()
        }
    }

    /// Bind `teacher` and open intake for the current cycle. Returns the cycle.
    pub fn claim(&self, teacher: TeacherId) -> Result<u32, ProtocolError> {
        let mut room = self.room.lock();
        if let Some(bound) = room.teacher {
            if bound != teacher {
                return Err(ProtocolError::NotBound {
                    classroom: self.id,
                    teacher,
                });
            }
        }
        room.teacher = Some(teacher);
        room.lesson = LessonState::Waiting;
        room.members.clear();
        let cycle = room.cycle;
        self.record(cycle, Transition::Claimed { teacher });

        debug!("{} claimed {} for cycle {}", teacher, self.id, cycle);
        Ok(cycle)
    }

    /// Try to join the current cycle.
    ///
    /// `history` is the classrooms the student attended so far. The check
    /// and the enrollment happen under the classroom lock, so concurrent
    /// enrollers cannot both slip past the same check.
    pub fn enroll(&self, student: StudentId, history: &[ClassroomId]) -> Enrollment {
        let mut room = self.room.lock();
        if room.teacher.is_none() {
            return Enrollment::Refused(Refusal::Unclaimed);
        }
        if room.lesson != LessonState::Waiting {
            return Enrollment::Refused(Refusal::Closed(room.lesson));
        }
        if history.contains(&self.id) {
            return Enrollment::Refused(Refusal::AlreadyAttended);
        }
        if !room.members.insert(student) {
            return Enrollment::Refused(Refusal::AlreadyMember);
        }

        let enrolled = room.members.len();
        let quorum_reached = enrolled == self.quorum;
        room.revision += 1;
        self.intake.notify_all();

        debug!("{} joined {}. Student count: {}", student, self.id, enrolled);
        Enrollment::Joined {
            cycle: room.cycle,
            quorum_reached,
        }
    }

    /// Wake the teacher so it re-evaluates its start predicate.
    pub fn nudge(&self) {
        let mut room = self.room.lock();
        room.revision += 1;
        self.intake.notify_all();
    }

    /// Counter of enrollments and nudges seen by this classroom. A teacher
    /// reads it before evaluating its start predicate and hands it to
    /// [`wait_for_intake`](Self::wait_for_intake), so a change that lands
    /// in between is not slept through.
    pub fn intake_revision(&self) -> u64 {
        self.room.lock().revision
    }

    /// Teacher side: wait until the intake revision differs from `seen`,
    /// intake closes, or `timeout` elapses.
    pub fn wait_for_intake(&self, seen: u64, timeout: Duration) -> WaitOutcome {
        let mut room = self.room.lock();
        if room.revision != seen || room.lesson != LessonState::Waiting {
            return WaitOutcome::Changed;
        }
        let result = self.intake.wait_for(&mut room, timeout);
        if result.timed_out() && room.revision == seen {
            WaitOutcome::TimedOut
        } else {
            WaitOutcome::Changed
        }
    }

    /// Close intake and start the lesson.
    ///
    /// A `Quorum` start requires a quorum of members. A `Fallback` start
    /// requires at least one member and an eligible population below the
    /// quorum. A fallback request that finds a quorum already enrolled is
    /// recorded as a quorum start.
    pub fn start_lesson(
        &self,
        teacher: TeacherId,
        basis: StartBasis,
    ) -> Result<LessonStart, ProtocolError> {
        let mut room = self.room.lock();
        self.check_bound(&room, teacher)?;
        self.check_state(&room, LessonState::Waiting, LessonState::InProgress)?;

        let enrolled = room.members.len();
        let basis = if enrolled >= self.quorum {
            StartBasis::Quorum
        } else {
            match basis {
                StartBasis::Quorum => {
                    return Err(ProtocolError::QuorumNotMet {
                        classroom: self.id,
                        enrolled,
                        quorum: self.quorum,
                    })
                }
                StartBasis::Fallback {
                    eligible,
                    contested,
                } => {
                    if enrolled == 0
                        || contested > eligible
                        || eligible - contested >= self.quorum
                    {
                        return Err(ProtocolError::FallbackNotJustified {
                            classroom: self.id,
                            enrolled,
                            eligible,
                            contested,
                            quorum: self.quorum,
                        });
                    }
                    basis
                }
            }
        };

        room.lesson = LessonState::InProgress;
        let cycle = room.cycle;
        self.record(cycle, Transition::Started { enrolled, basis });
        self.started.notify_all();

        if basis.is_degraded() {
            warn!(
                "{} starting lesson in {} with {} students (fewer than required)",
                teacher, self.id, enrolled
            );
        } else {
            debug!(
                "{} starting lesson in {} with {} students",
                teacher, self.id, enrolled
            );
        }
        Ok(LessonStart {
            cycle,
            enrolled,
            basis,
        })
    }

    /// End the running lesson. Returns the number of attendees.
    pub fn end_lesson(&self, teacher: TeacherId) -> Result<usize, ProtocolError> {
        let mut room = self.room.lock();
        self.check_bound(&room, teacher)?;
        self.check_state(&room, LessonState::InProgress, LessonState::Ended)?;

        room.lesson = LessonState::Ended;
        let attendees = room.members.len();
        let cycle = room.cycle;
        self.record(cycle, Transition::Ended { attendees });
        self.ended.notify_all();

        debug!("{} ending lesson in {}", teacher, self.id);
        Ok(attendees)
    }

    /// Clear membership, unbind the teacher and reopen in `Waiting` for the
    /// next cycle. Returns the new cycle.
    pub fn reset(&self, teacher: TeacherId) -> Result<u32, ProtocolError> {
        let mut room = self.room.lock();
        self.check_bound(&room, teacher)?;
        self.check_state(&room, LessonState::Ended, LessonState::Waiting)?;

        let finished = room.cycle;
        room.members.clear();
        room.teacher = None;
        room.lesson = LessonState::Waiting;
        room.cycle += 1;
        self.record(finished, Transition::Reset);

        trace!("{} reset for cycle {}", self.id, room.cycle);
        Ok(room.cycle)
    }

    /// Unbind an empty classroom whose teacher is leaving.
    ///
    /// Returns false, leaving everything untouched, if a student enrolled
    /// in the meantime.
    pub fn close(&self, teacher: TeacherId) -> Result<bool, ProtocolError> {
        let mut room = self.room.lock();
        self.check_bound(&room, teacher)?;
        if room.lesson != LessonState::Waiting {
            return Err(ProtocolError::InvalidTransition {
                classroom: self.id,
                from: room.lesson,
                to: LessonState::Waiting,
            });
        }
        if !room.members.is_empty() {
            return Ok(false);
        }

        room.teacher = None;
        let cycle = room.cycle;
        self.record(cycle, Transition::Closed);
        debug!("{} closed {}", teacher, self.id);
        Ok(true)
    }

    /// Student side: block until the lesson of `cycle` has started.
    pub fn await_start(
        &self,
        cycle: u32,
        timeout: Duration,
        abort: &AbortSignal,
    ) -> Result<(), SyncError> {
        let mut room = self.room.lock();
        while !room.has_started(cycle) {
            abort.check()?;
            trace!(
                "waiting for lesson to start in {}; {} students waiting",
                self.id,
                room.members.len()
            );
            self.started.wait_for(&mut room, timeout);
        }
        Ok(())
    }

    /// Student side: block until the lesson of `cycle` has ended.
    pub fn await_end(
        &self,
        cycle: u32,
        timeout: Duration,
        abort: &AbortSignal,
    ) -> Result<(), SyncError> {
        let mut room = self.room.lock();
        while !room.has_ended(cycle) {
            abort.check()?;
            self.ended.wait_for(&mut room, timeout);
        }
        Ok(())
    }

    fn check_bound(
        &self,
        room: &MutexGuard<'_, Room>,
        teacher: TeacherId,
    ) -> Result<(), ProtocolError> {
        if room.teacher == Some(teacher) {
            Ok(())
        } else {
            Err(ProtocolError::NotBound {
                classroom: self.id,
                teacher,
            })
        }
    }

    fn check_state(
        &self,
        room: &MutexGuard<'_, Room>,
        expected: LessonState,
        to: LessonState,
    ) -> Result<(), ProtocolError> {
        if room.lesson == expected {
            Ok(())
        } else {
            Err(ProtocolError::InvalidTransition {
                classroom: self.id,
                from: room.lesson,
                to,
            })
        }
    }

    // Called with the room lock held so journal order is transition order.
    fn record(&self, cycle: u32, transition: Transition) {
        if let Some(journal) = &self.journal {
            let event = LessonEvent {
                classroom: self.id,
                cycle,
                transition,
            };
            if journal.send(event).is_err() {
                trace!("{}: journal receiver dropped", self.id);
            }
        }
    }
}

impl std::fmt::Debug for Classroom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("Classroom")
            .field("id", &snapshot.id)
            .field("state", &snapshot.state)
            .field("teacher", &snapshot.teacher)
            .field("enrolled", &snapshot.enrolled)
            .field("cycle", &snapshot.cycle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::sync::Arc;
    use std::thread;

    const QUORUM: usize = 10;

    fn fallback(eligible: usize, contested: usize) -> StartBasis {
        StartBasis::Fallback {
            eligible,
            contested,
        }
    }

    fn teacher() -> TeacherId {
        TeacherId::from_index(0)
    }

    fn student(index: usize) -> StudentId {
        StudentId::from_index(index)
    }

    fn claimed() -> Classroom {
        let classroom = Classroom::new(ClassroomId::from_index(0), QUORUM);
        classroom.claim(teacher()).unwrap();
        classroom
    }

    #[test]
    fn test_unclaimed_classroom_refuses() {
        let classroom = Classroom::new(ClassroomId::from_index(0), QUORUM);
        assert_eq!(
            classroom.enroll(student(0), &[]),
            Enrollment::Refused(Refusal::Unclaimed)
        );
        assert_eq!(classroom.enrolled_count(), 0);
    }

    #[test]
    fn test_enroll_reports_quorum_once() {
        let classroom = claimed();
        for index in 0..QUORUM - 1 {
            assert_eq!(
                classroom.enroll(student(index), &[]),
                Enrollment::Joined {
                    cycle: 0,
                    quorum_reached: false
                }
            );
        }
        assert_eq!(
            classroom.enroll(student(QUORUM - 1), &[]),
            Enrollment::Joined {
                cycle: 0,
                quorum_reached: true
            }
        );
        assert_eq!(
            classroom.enroll(student(QUORUM), &[]),
            Enrollment::Joined {
                cycle: 0,
                quorum_reached: false
            }
        );
        assert_eq!(classroom.enrolled_count(), QUORUM + 1);
    }

    #[test]
    fn test_enroll_refuses_member_and_past_attendee() {
        let classroom = claimed();
        assert!(matches!(
            classroom.enroll(student(0), &[]),
            Enrollment::Joined { .. }
        ));
        assert_eq!(
            classroom.enroll(student(0), &[]),
            Enrollment::Refused(Refusal::AlreadyMember)
        );
        assert_eq!(
            classroom.enroll(student(1), &[ClassroomId::from_index(3), classroom.id()]),
            Enrollment::Refused(Refusal::AlreadyAttended)
        );
        assert_eq!(classroom.enrolled_count(), 1);
    }

    #[test]
    fn test_quorum_path_closes_intake() {
        // Twelve eligible students, quorum ten: the first ten are in the
        // lesson, the last two find intake closed.
        let classroom = claimed();
        for index in 0..QUORUM {
            assert!(matches!(
                classroom.enroll(student(index), &[]),
                Enrollment::Joined { .. }
            ));
        }
        let start = classroom
            .start_lesson(teacher(), StartBasis::Quorum)
            .unwrap();
        assert_eq!(start.enrolled, QUORUM);
        assert_eq!(start.basis, StartBasis::Quorum);

        for index in QUORUM..QUORUM + 2 {
            assert_eq!(
                classroom.enroll(student(index), &[]),
                Enrollment::Refused(Refusal::Closed(LessonState::InProgress))
            );
        }
        assert_eq!(classroom.enrolled_count(), QUORUM);
    }

    #[test]
    fn test_quorum_start_refused_below_quorum() {
        let classroom = claimed();
        classroom.enroll(student(0), &[]);
        let err = classroom
            .start_lesson(teacher(), StartBasis::Quorum)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::QuorumNotMet { enrolled: 1, .. }));
        assert_eq!(classroom.snapshot().state, LessonState::Waiting);
    }

    #[test]
    fn test_fallback_start_rules() {
        let classroom = claimed();
        let err = classroom
            .start_lesson(teacher(), fallback(2, 0))
            .unwrap_err();
        assert!(matches!(err, ProtocolError::FallbackNotJustified { enrolled: 0, .. }));

        classroom.enroll(student(0), &[]);
        let err = classroom
            .start_lesson(teacher(), fallback(QUORUM, 0))
            .unwrap_err();
        assert!(matches!(err, ProtocolError::FallbackNotJustified { .. }));

        let start = classroom
            .start_lesson(teacher(), fallback(1, 0))
            .unwrap();
        assert_eq!(start.enrolled, 1);
        assert!(start.basis.is_degraded());
    }

    #[test]
    fn test_fallback_counts_contested_students() {
        let classroom = claimed();
        classroom.enroll(student(0), &[]);

        let err = classroom
            .start_lesson(teacher(), fallback(12, 2))
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::FallbackNotJustified {
                eligible: 12,
                contested: 2,
                ..
            }
        ));

        let start = classroom
            .start_lesson(teacher(), fallback(12, 5))
            .unwrap();
        assert_eq!(start.basis, fallback(12, 5));
        assert_eq!(start.basis.reachable(), Some(7));
    }

    #[test]
    fn test_fallback_with_quorum_recorded_as_quorum() {
        let classroom = claimed();
        for index in 0..QUORUM {
            classroom.enroll(student(index), &[]);
        }
        let start = classroom
            .start_lesson(teacher(), fallback(3, 0))
            .unwrap();
        assert_eq!(start.basis, StartBasis::Quorum);
    }

    #[test]
    fn test_transitions_require_bound_teacher_and_order() {
        let classroom = claimed();
        let stranger = TeacherId::from_index(1);

        assert!(matches!(
            classroom.claim(stranger),
            Err(ProtocolError::NotBound { .. })
        ));
        assert!(matches!(
            classroom.end_lesson(teacher()),
            Err(ProtocolError::InvalidTransition {
                from: LessonState::Waiting,
                to: LessonState::Ended,
                ..
            })
        ));
        assert!(matches!(
            classroom.reset(teacher()),
            Err(ProtocolError::InvalidTransition { .. })
        ));

        classroom.enroll(student(0), &[]);
        classroom
            .start_lesson(teacher(), fallback(1, 0))
            .unwrap();
        assert!(matches!(
            classroom.end_lesson(stranger),
            Err(ProtocolError::NotBound { .. })
        ));
    }

    #[test]
    fn test_reset_round_trip() {
        let classroom = claimed();
        for index in 0..QUORUM {
            classroom.enroll(student(index), &[]);
        }
        classroom
            .start_lesson(teacher(), StartBasis::Quorum)
            .unwrap();
        assert_eq!(classroom.end_lesson(teacher()).unwrap(), QUORUM);
        assert_eq!(classroom.reset(teacher()).unwrap(), 1);

        let snapshot = classroom.snapshot();
        assert_eq!(snapshot.state, LessonState::Waiting);
        assert_eq!(snapshot.teacher, None);
        assert_eq!(snapshot.enrolled, 0);
        assert!(classroom.members().is_empty());
        assert_eq!(snapshot.cycle, 1);

        // reopened for the next cycle only once claimed again
        assert_eq!(
            classroom.enroll(student(QUORUM), &[]),
            Enrollment::Refused(Refusal::Unclaimed)
        );
        assert_eq!(classroom.claim(teacher()).unwrap(), 1);
    }

    #[test]
    fn test_close_only_when_empty() {
        let classroom = claimed();
        classroom.enroll(student(0), &[]);
        assert!(!classroom.close(teacher()).unwrap());
        assert_eq!(classroom.snapshot().teacher, Some(teacher()));

        let empty = claimed();
        assert!(empty.close(teacher()).unwrap());
        assert_eq!(empty.snapshot().teacher, None);
        assert_eq!(
            empty.enroll(student(0), &[]),
            Enrollment::Refused(Refusal::Unclaimed)
        );
    }

    #[test]
    fn test_held_below_quorum() {
        let classroom = claimed();
        classroom.enroll(student(0), &[]);
        classroom.enroll(student(1), &[]);
        let mut held = classroom.held_below_quorum();
        held.sort();
        assert_eq!(held, vec![student(0), student(1)]);

        for index in 2..QUORUM {
            classroom.enroll(student(index), &[]);
        }
        assert!(classroom.held_below_quorum().is_empty());
    }

    #[test]
    fn test_journal_records_cycle_in_order() {
        let (tx, rx) = unbounded();
        let classroom = Classroom::new(ClassroomId::from_index(2), 1).with_journal(tx);
        let teacher = TeacherId::from_index(2);

        classroom.claim(teacher).unwrap();
        classroom.enroll(student(0), &[]);
        classroom.start_lesson(teacher, StartBasis::Quorum).unwrap();
        classroom.end_lesson(teacher).unwrap();
        classroom.reset(teacher).unwrap();

        let names: Vec<_> = rx.try_iter().map(|e| e.transition.name()).collect();
        assert_eq!(names, vec!["Claimed", "Started", "Ended", "Reset"]);
    }

    #[test]
    fn test_students_wake_on_start_and_end() {
        let classroom = Arc::new(claimed());
        let abort = Arc::new(AbortSignal::new());

        let mut students = Vec::new();
        for index in 0..QUORUM {
            let Enrollment::Joined { cycle, .. } = classroom.enroll(student(index), &[]) else {
                panic!("enrollment refused");
            };
            let classroom = Arc::clone(&classroom);
            let abort = Arc::clone(&abort);
            students.push(thread::spawn(move || {
                classroom.await_start(cycle, Duration::from_millis(20), &abort)?;
                classroom.await_end(cycle, Duration::from_millis(20), &abort)
            }));
        }

        thread::sleep(Duration::from_millis(20));
        classroom
            .start_lesson(teacher(), StartBasis::Quorum)
            .unwrap();
        thread::sleep(Duration::from_millis(20));
        classroom.end_lesson(teacher()).unwrap();
        classroom.reset(teacher()).unwrap();

        for handle in students {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(classroom.snapshot().cycle, 1);
    }

    #[test]
    fn test_waiting_student_unwinds_on_abort() {
        let classroom = Arc::new(claimed());
        let abort = Arc::new(AbortSignal::new());
        classroom.enroll(student(0), &[]);

        let waiter = {
            let classroom = Arc::clone(&classroom);
            let abort = Arc::clone(&abort);
            thread::spawn(move || classroom.await_start(0, Duration::from_millis(5), &abort))
        };
        abort.raise();
        assert!(matches!(waiter.join().unwrap(), Err(SyncError::Aborted)));
    }

    #[test]
    fn test_wait_for_intake_sees_enrollment() {
        let classroom = Arc::new(claimed());
        let enroller = {
            let classroom = Arc::clone(&classroom);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                classroom.enroll(student(7), &[]);
            })
        };

        let seen = classroom.intake_revision();
        let mut outcome = WaitOutcome::TimedOut;
        for _ in 0..100 {
            outcome = classroom.wait_for_intake(seen, Duration::from_millis(50));
            if outcome == WaitOutcome::Changed {
                break;
            }
        }
        enroller.join().unwrap();
        assert_eq!(outcome, WaitOutcome::Changed);
        assert_eq!(classroom.enrolled_count(), 1);
    }

    #[test]
    fn test_nudge_between_check_and_wait_is_not_lost() {
        let classroom = claimed();
        let seen = classroom.intake_revision();
        classroom.nudge();
        assert_eq!(
            classroom.wait_for_intake(seen, Duration::from_secs(5)),
            WaitOutcome::Changed
        );

        let seen = classroom.intake_revision();
        assert_eq!(
            classroom.wait_for_intake(seen, Duration::from_millis(5)),
            WaitOutcome::TimedOut
        );
    }

    #[test]
    fn test_refused_enrollment_leaves_revision() {
        let classroom = Classroom::new(ClassroomId::from_index(0), QUORUM);
        let seen = classroom.intake_revision();
        assert_eq!(
            classroom.enroll(student(0), &[]),
            Enrollment::Refused(Refusal::Unclaimed)
        );
        assert_eq!(classroom.intake_revision(), seen);

        classroom.claim(teacher()).unwrap();
        classroom.enroll(student(0), &[]);
        assert_eq!(classroom.intake_revision(), seen + 1);
    }
}
