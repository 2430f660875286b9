//! Strongly-typed identifiers for actors and classrooms.
//!
//! Each identifier is a thin wrapper around a dense index with a phantom
//! type parameter, so a student index can never be passed where a
//! classroom index is expected. Indices are assigned by the driver in
//! `0..n` order and double as positions in the record arrays.
//!
//! # Examples
//!
//! ```
//! use schola_core::id::{ClassroomId, TeacherId};
//!
//! let teacher = TeacherId::from_index(3);
//! assert_eq!(teacher.classroom(), ClassroomId::from_index(3));
//! assert_eq!(teacher.to_string(), "teacher-3");
//! ```

use serde::{Serialize, Serializer};
use std::cmp::{Ord, PartialOrd};
use std::fmt;
use std::marker::PhantomData;

/// Naming for each identifier kind.
pub trait IdKind {
    /// Prefix used when displaying the identifier.
    const PREFIX: &'static str;
}

/// A type-safe identifier based on a dense index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    index: usize,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create an identifier from its index.
    pub const fn from_index(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Get the underlying index.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Iterate over the first `count` identifiers of this kind.
    ///
    /// ```
    /// use schola_core::id::StudentId;
    ///
    /// let ids: Vec<_> = StudentId::range(3).map(|id| id.index()).collect();
    /// assert_eq!(ids, vec![0, 1, 2]);
    /// ```
    pub fn range(count: usize) -> impl Iterator<Item = Self> {
        (0..count).map(Self::from_index)
    }
}

impl<T: IdKind> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", T::PREFIX, self.index)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.index as u64)
    }
}

/// Marker type for students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentMarker;
impl IdKind for StudentMarker {
    const PREFIX: &'static str = "student";
}
/// Identifier for a student.
pub type StudentId = Id<StudentMarker>;

/// Marker type for teachers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeacherMarker;
impl IdKind for TeacherMarker {
    const PREFIX: &'static str = "teacher";
}
/// Identifier for a teacher.
pub type TeacherId = Id<TeacherMarker>;

/// Marker type for classrooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassroomMarker;
impl IdKind for ClassroomMarker {
    const PREFIX: &'static str = "classroom";
}
/// Identifier for a classroom.
pub type ClassroomId = Id<ClassroomMarker>;

impl TeacherId {
    /// The classroom this teacher is permanently bound to.
    pub const fn classroom(&self) -> ClassroomId {
        ClassroomId::from_index(self.index)
    }
}

impl ClassroomId {
    /// The teacher that owns this classroom.
    pub const fn teacher(&self) -> TeacherId {
        TeacherId::from_index(self.index)
    }
}
