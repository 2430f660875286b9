//! Error types for the schola simulation.
//!
//! Errors are organized by concern, with each concern having its own error
//! type. The root error type, `Error`, can wrap any of them so that the
//! driver and the command-line front end can handle failures uniformly.
//!
//! Two conditions that look like failures have no variant here: an expired
//! bounded wait is an ordinary retry, and an unreachable quorum is handled
//! by a degraded lesson start.

use crate::id::{ClassroomId, StudentId, TeacherId};
use crate::types::LessonState;
use thiserror::Error;

/// Root error type for the simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failures while setting up a run, before any actor is running
    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    /// Unrecoverable synchronization failures during a run
    #[error("Synchronization error: {0}")]
    Sync(#[from] SyncError),

    /// Refused classroom transitions and journal audit failures
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {reason}")]
    Unreadable {
        /// Path that was requested
        path: String,

        /// Underlying I/O failure
        reason: String,
    },

    /// A parameter is outside its allowed range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending parameter
        field: &'static str,

        /// Why the value was rejected
        reason: String,
    },
}

/// Failures before any actor runs.
#[derive(Debug, Error)]
pub enum InitError {
    /// An actor thread could not be spawned
    #[error("Failed to spawn thread for {actor}: {reason}")]
    ThreadSpawn {
        /// Name of the actor whose thread failed to start
        actor: String,

        /// Underlying OS failure
        reason: String,
    },
}

/// Unrecoverable synchronization failures.
///
/// Any of these invalidates the shared counters for every actor, so the
/// whole run is abandoned rather than the failing actor restarted.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An actor thread panicked
    #[error("Actor {actor} panicked: {message}")]
    ActorPanicked {
        /// Name of the actor
        actor: String,

        /// Panic payload, when it was a string
        message: String,
    },

    /// The run was aborted because another actor failed
    #[error("Run aborted after a failure in another actor")]
    Aborted,

    /// A student left the school twice
    #[error("Student {0} departed more than once")]
    DuplicateStudentDeparture(StudentId),

    /// A teacher left the school twice
    #[error("Teacher {0} departed more than once")]
    DuplicateTeacherDeparture(TeacherId),

    /// An identifier outside the configured population was used
    #[error("Unknown actor: {0}")]
    UnknownActor(String),
}

/// Refused classroom transitions and audit violations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The classroom is bound to another teacher (or to none)
    #[error("Classroom {classroom} is not bound to teacher {teacher}")]
    NotBound {
        /// Classroom that refused the transition
        classroom: ClassroomId,

        /// Teacher that requested it
        teacher: TeacherId,
    },

    /// The transition is not allowed from the current state
    #[error("Classroom {classroom} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Classroom that refused the transition
        classroom: ClassroomId,

        /// Current state
        from: LessonState,

        /// Requested state
        to: LessonState,
    },

    /// A quorum start was requested without a quorum
    #[error("Classroom {classroom} has {enrolled} enrolled, quorum is {quorum}")]
    QuorumNotMet {
        /// Classroom that refused the start
        classroom: ClassroomId,

        /// Students enrolled at the time of the request
        enrolled: usize,

        /// Configured quorum
        quorum: usize,
    },

    /// A degraded start was requested while the quorum was still reachable
    #[error(
        "Classroom {classroom} fallback refused: {enrolled} enrolled, {eligible} eligible, {contested} contested, quorum {quorum}"
    )]
    FallbackNotJustified {
        /// Classroom that refused the start
        classroom: ClassroomId,

        /// Students enrolled at the time of the request
        enrolled: usize,

        /// Eligible population reported by the teacher
        eligible: usize,

        /// Eligible students held by other classrooms
        contested: usize,

        /// Configured quorum
        quorum: usize,
    },

    /// The journal shows a transition out of order
    #[error("Classroom {classroom} cycle {cycle}: expected {expected}, found {found}")]
    Sequence {
        /// Classroom whose journal is inconsistent
        classroom: ClassroomId,

        /// Lesson cycle in which the violation occurred
        cycle: u32,

        /// Transition expected at this point
        expected: String,

        /// Transition actually recorded
        found: String,
    },

    /// A student attended the same classroom twice
    #[error("Student {student} attended classroom {classroom} more than once")]
    RepeatedClassroom {
        /// Student whose history repeats
        student: StudentId,

        /// Classroom that appears twice
        classroom: ClassroomId,
    },

    /// Final counters disagree with each other or with the configured bounds
    #[error("Conservation violated: {0}")]
    Conservation(String),

    /// The journal shows a lesson start that was neither quorum nor fallback
    #[error("Classroom {classroom} cycle {cycle} started without justification: {detail}")]
    UnjustifiedStart {
        /// Classroom whose journal is inconsistent
        classroom: ClassroomId,

        /// Lesson cycle in which the violation occurred
        cycle: u32,

        /// Recorded counts
        detail: String,
    },
}

/// Result type alias for schola operations.
pub type Result<T> = std::result::Result<T, Error>;
