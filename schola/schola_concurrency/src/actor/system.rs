//! The school driver.
//!
//! The `School` builds the shared campus, spawns one named OS thread per
//! actor, and joins every one of them before any record is read. A failure
//! in any actor aborts the whole run.

use crossbeam_channel::{unbounded, Receiver};
use log::{debug, error, info};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use schola_core::error::{InitError, ProtocolError, SyncError};
use schola_core::id::{StudentId, TeacherId};
use schola_core::traits::LessonPacer;
use schola_core::types::{LessonEvent, StudentRecord, TeacherRecord};
use schola_core::{Error, FixedPacer, Result, RunSummary, SimulationConfig};

use super::{Actor, Campus, Student, Teacher};
use crate::journal::{Journal, JournalStats};

/// Everything a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Configuration of the run
    pub config: SimulationConfig,

    /// Final student records, indexed by student
    pub students: Vec<StudentRecord>,

    /// Final teacher records, indexed by teacher
    pub teachers: Vec<TeacherRecord>,

    /// Every classroom transition of the run
    pub journal: Journal,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Aggregate figures for reporting.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_records(&self.config, &self.students, &self.teachers)
    }

    /// Audit the journal and the final records against each other.
    pub fn verify(&self) -> std::result::Result<JournalStats, ProtocolError> {
        let stats = self.journal.verify(self.config.quorum)?;

        for student in &self.students {
            if student.has_repeats() {
                let classroom = student
                    .history
                    .iter()
                    .enumerate()
                    .find(|(i, c)| student.history[..*i].contains(c))
                    .map(|(_, c)| *c);
                if let Some(classroom) = classroom {
                    return Err(ProtocolError::RepeatedClassroom {
                        student: student.id,
                        classroom,
                    });
                }
            }
        }

        for teacher in &self.teachers {
            if let Some(foreign) = teacher.history.iter().find(|c| **c != teacher.id.classroom()) {
                return Err(ProtocolError::Conservation(format!(
                    "{} taught in {}",
                    teacher.id, foreign
                )));
            }
        }

        let required = self.config.required_lessons as usize;
        let taught: usize = self.teachers.iter().map(|t| t.lessons_taught as usize).sum();
        let attended: usize = self
            .students
            .iter()
            .map(|s| s.lessons_attended as usize)
            .sum();

        if taught > self.config.teachers() * required {
            return Err(ProtocolError::Conservation(format!(
                "{} lessons taught, at most {} allowed",
                taught,
                self.config.teachers() * required
            )));
        }
        if attended > self.config.total_students() * required {
            return Err(ProtocolError::Conservation(format!(
                "{} lessons attended, at most {} allowed",
                attended,
                self.config.total_students() * required
            )));
        }
        if taught != stats.lessons {
            return Err(ProtocolError::Conservation(format!(
                "teachers recorded {} lessons, journal shows {}",
                taught, stats.lessons
            )));
        }
        if attended != stats.attendees {
            return Err(ProtocolError::Conservation(format!(
                "students recorded {} attendances, journal shows {}",
                attended, stats.attendees
            )));
        }
        Ok(stats)
    }
}

/// Builds the population, runs it to completion, and collects the records.
pub struct School {
    config: SimulationConfig,
    campus: Arc<Campus>,
    journal: Receiver<LessonEvent>,
}

impl School {
    /// Create a school with an explicit pacer.
    pub fn new(config: SimulationConfig, pacer: Arc<dyn LessonPacer>) -> Result<Self> {
        config.validate()?;
        let (tx, journal) = unbounded();
        let campus = Arc::new(Campus::new(&config, pacer, tx));
        Ok(Self {
            config,
            campus,
            journal,
        })
    }

    /// Create a school paced by the configured durations.
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        let pacer = Arc::new(FixedPacer::from_config(&config));
        Self::new(config, pacer)
    }

    /// Configuration of this school.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Shared state of the run.
    pub fn campus(&self) -> &Arc<Campus> {
        &self.campus
    }

    /// Run every actor to completion.
    ///
    /// Teachers are spawned before students. If any actor fails, the run
    /// is aborted, every thread is still joined, and the first failure
    /// other than the resulting `Aborted` unwinds is returned.
    pub fn run(self) -> Result<RunOutcome> {
        let started = Instant::now();
        info!(
            "Starting simulation: {} classrooms, {} students, quorum {}, {} lessons each",
            self.config.classrooms,
            self.config.total_students(),
            self.config.quorum,
            self.config.required_lessons
        );

        let mut teachers = Vec::with_capacity(self.config.teachers());
        for id in TeacherId::range(self.config.teachers()) {
            match spawn_actor(&self.campus, Teacher::new(id, Arc::clone(&self.campus))) {
                Ok(handle) => teachers.push(handle),
                Err(e) => return Err(self.abandon(e, teachers, Vec::new())),
            }
        }

        let mut students = Vec::with_capacity(self.config.total_students());
        for id in StudentId::range(self.config.total_students()) {
            match spawn_actor(&self.campus, Student::new(id, Arc::clone(&self.campus))) {
                Ok(handle) => students.push(handle),
                Err(e) => return Err(self.abandon(e, teachers, students)),
            }
        }
        debug!(
            "Spawned {} teacher and {} student threads",
            teachers.len(),
            students.len()
        );

        let mut failure = None;
        let teachers = join_all(teachers, &mut failure);
        let students = join_all(students, &mut failure);
        if let Some(e) = failure {
            return Err(e);
        }

        let journal = Journal::drain(&self.journal);
        let elapsed = started.elapsed();
        info!(
            "Simulation finished in {:.1}ms with {} classroom transitions",
            elapsed.as_secs_f64() * 1000.0,
            journal.len()
        );

        Ok(RunOutcome {
            config: self.config,
            students,
            teachers,
            journal,
            elapsed,
        })
    }

    /// Abort, join whatever was spawned, and hand back the spawn failure.
    fn abandon(
        &self,
        cause: Error,
        teachers: Vec<JoinHandle<Result<TeacherRecord>>>,
        students: Vec<JoinHandle<Result<StudentRecord>>>,
    ) -> Error {
        error!("Abandoning run: {}", cause);
        self.campus.abort_run();
        let mut ignored = None;
        join_all(teachers, &mut ignored);
        join_all(students, &mut ignored);
        cause
    }
}

/// Spawn `actor` on its own named thread.
///
/// The body runs under `catch_unwind`; an error or a panic raises the
/// run-wide abort before the thread returns.
fn spawn_actor<A: Actor>(campus: &Arc<Campus>, actor: A) -> Result<JoinHandle<Result<A::Record>>> {
    let name = actor.name();
    let campus = Arc::clone(campus);
    let thread_name = name.clone();

    thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| actor.run())).unwrap_or_else(
                |payload| {
                    Err(SyncError::ActorPanicked {
                        actor: name.clone(),
                        message: panic_message(payload.as_ref()),
                    }
                    .into())
                },
            );

            if let Err(e) = &result {
                if !is_aborted(e) {
                    error!("{} failed: {}", name, e);
                }
                campus.abort_run();
            }
            result
        })
        .map_err(|e| {
            InitError::ThreadSpawn {
                actor: thread_name,
                reason: e.to_string(),
            }
            .into()
        })
}

/// Join every handle in order. The first failure that is not a mere
/// `Aborted` unwind is kept in `failure`; `Aborted` is kept only if
/// nothing better turns up.
fn join_all<T>(handles: Vec<JoinHandle<Result<T>>>, failure: &mut Option<Error>) -> Vec<T> {
    let mut records = Vec::with_capacity(handles.len());
    for handle in handles {
        let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
        let result = handle.join().unwrap_or_else(|payload| {
            Err(SyncError::ActorPanicked {
                actor: name,
                message: panic_message(payload.as_ref()),
            }
            .into())
        });

        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                let replace = match failure {
                    None => true,
                    Some(current) => is_aborted(current) && !is_aborted(&e),
                };
                if replace {
                    *failure = Some(e);
                }
            }
        }
    }
    records
}

fn is_aborted(error: &Error) -> bool {
    matches!(error, Error::Sync(SyncError::Aborted))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<unknown panic>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schola_core::id::ClassroomId;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            classrooms: 2,
            students_per_classroom: 3,
            quorum: 2,
            required_lessons: 2,
            lesson_duration_ms: 0,
            wait_timeout_ms: 5,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            quorum: 0,
            ..small_config()
        };
        assert!(matches!(
            School::with_config(config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_small_run_verifies() {
        let outcome = School::with_config(small_config()).unwrap().run().unwrap();
        assert_eq!(outcome.students.len(), 6);
        assert_eq!(outcome.teachers.len(), 2);
        assert!(outcome.verify().is_ok());
        assert_eq!(outcome.summary().students_total, 6);
    }

    #[test]
    fn test_panicking_pacer_aborts_run() {
        struct Faulty;

        impl LessonPacer for Faulty {
            fn hold_lesson(&self, _classroom: ClassroomId) {
                panic!("projector caught fire");
            }

            fn recess(&self, _teacher: TeacherId) {}
        }

        let school = School::new(small_config(), Arc::new(Faulty)).unwrap();
        let err = school.run().unwrap_err();
        match err {
            Error::Sync(SyncError::ActorPanicked { actor, message }) => {
                assert!(actor.starts_with("teacher-"));
                assert_eq!(message, "projector caught fire");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_verify_flags_repeats() {
        let mut outcome = School::with_config(small_config()).unwrap().run().unwrap();
        let student = &mut outcome.students[0];
        student.history = vec![ClassroomId::from_index(1), ClassroomId::from_index(1)];
        assert!(matches!(
            outcome.verify(),
            Err(ProtocolError::RepeatedClassroom { .. })
        ));
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "<unknown panic>");
    }
}
