//! Lesson states and classroom transitions.

use serde::Serialize;
use std::fmt;

use crate::id::{ClassroomId, TeacherId};

/// State of a classroom within one lesson cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LessonState {
    /// Intake is open; students may enroll.
    Waiting,

    /// The lesson is running; intake is closed.
    InProgress,

    /// The lesson is over and the classroom awaits its reset.
    Ended,
}

impl fmt::Display for LessonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

/// Why a teacher was allowed to start a lesson.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StartBasis {
    /// At least a quorum of students enrolled.
    Quorum,

    /// Fewer than a quorum of eligible students can still reach this
    /// classroom.
    ///
    /// Students held by another classroom's under-quorum intake are
    /// eligible but not reachable.
    Fallback {
        /// Students present, below quota, that never attended the classroom
        eligible: usize,

        /// Those of them held by another classroom's under-quorum intake
        contested: usize,
    },
}

impl StartBasis {
    /// Whether this start was below quorum.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Eligible students not held elsewhere, for a fallback start.
    pub fn reachable(&self) -> Option<usize> {
        match self {
            Self::Quorum => None,
            Self::Fallback {
                eligible,
                contested,
            } => Some(eligible.saturating_sub(*contested)),
        }
    }
}

/// A single classroom transition, as recorded in the journal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// A teacher bound the classroom and opened intake.
    Claimed {
        /// The binding teacher
        teacher: TeacherId,
    },

    /// The lesson started.
    Started {
        /// Students enrolled at the moment of the start
        enrolled: usize,

        /// Quorum or fallback
        basis: StartBasis,
    },

    /// The lesson ended.
    Ended {
        /// Students that attended
        attendees: usize,
    },

    /// Membership cleared, teacher unbound, intake reset.
    Reset,

    /// The teacher gave up on the classroom with nobody enrolled.
    Closed,
}

impl Transition {
    /// Short name used in audit messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Claimed { .. } => "Claimed",
            Self::Started { .. } => "Started",
            Self::Ended { .. } => "Ended",
            Self::Reset => "Reset",
            Self::Closed => "Closed",
        }
    }
}

/// A transition tagged with its classroom and lesson cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LessonEvent {
    /// Classroom that transitioned
    pub classroom: ClassroomId,

    /// Lesson cycle, counted from zero
    pub cycle: u32,

    /// What happened
    pub transition: Transition,
}
