//! Per-actor records.
//!
//! A record is created when its actor starts, is mutated only by the
//! actor's own thread, and is handed back to the driver when the thread
//! returns. After that it never changes.

use serde::Serialize;
use std::fmt;

use crate::id::{ClassroomId, StudentId, TeacherId};

/// Why a student left the school.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StudentDeparture {
    /// Attended every required lesson.
    Completed,

    /// No teacher remained; left with partial credit.
    NoTeachersRemaining,
}

/// Why a teacher left the school.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TeacherDeparture {
    /// Taught every required lesson.
    Completed,

    /// No student could ever join the classroom again.
    Dismissed,
}

impl fmt::Display for StudentDeparture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::NoTeachersRemaining => write!(f, "no teachers remaining"),
        }
    }
}

impl fmt::Display for TeacherDeparture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// Final record of one student.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    /// The student
    pub id: StudentId,

    /// Number of lessons attended
    pub lessons_attended: u32,

    /// Classrooms attended, in order; never contains a repeat
    pub history: Vec<ClassroomId>,

    /// How the student left
    pub departure: StudentDeparture,
}

impl StudentRecord {
    /// Create an empty record for a newly arrived student.
    pub fn new(id: StudentId) -> Self {
        Self {
            id,
            lessons_attended: 0,
            history: Vec::new(),
            departure: StudentDeparture::NoTeachersRemaining,
        }
    }

    /// Whether the student already attended a lesson in `classroom`.
    pub fn has_attended(&self, classroom: ClassroomId) -> bool {
        self.history.contains(&classroom)
    }

    /// Record an attended lesson.
    pub fn attend(&mut self, classroom: ClassroomId) {
        self.history.push(classroom);
        self.lessons_attended += 1;
    }

    /// Whether `history` holds any classroom twice.
    pub fn has_repeats(&self) -> bool {
        self.history
            .iter()
            .enumerate()
            .any(|(i, classroom)| self.history[..i].contains(classroom))
    }
}

/// Final record of one teacher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeacherRecord {
    /// The teacher
    pub id: TeacherId,

    /// Number of lessons taught
    pub lessons_taught: u32,

    /// Number of those lessons started below quorum
    pub degraded_lessons: u32,

    /// Classroom of every lesson taught; always the teacher's own
    pub history: Vec<ClassroomId>,

    /// How the teacher left
    pub departure: TeacherDeparture,
}

impl TeacherRecord {
    /// Create an empty record for a newly arrived teacher.
    pub fn new(id: TeacherId) -> Self {
        Self {
            id,
            lessons_taught: 0,
            degraded_lessons: 0,
            history: Vec::new(),
            departure: TeacherDeparture::Completed,
        }
    }

    /// Record a finished lesson.
    pub fn teach(&mut self, classroom: ClassroomId, degraded: bool) {
        self.history.push(classroom);
        self.lessons_taught += 1;
        if degraded {
            self.degraded_lessons += 1;
        }
    }
}
