//! Teacher and student actors and the driver that runs them.
//!
//! This module provides:
//!
//! - The shared `Campus` every actor is handed at construction
//! - The teacher and student protocols, one OS thread per actor
//! - The `School` driver that spawns, supervises and joins every thread

pub mod campus;
pub mod student;
pub mod system;
pub mod teacher;

use schola_core::Result;

// Re-export key types
pub use campus::Campus;
pub use student::Student;
pub use system::{RunOutcome, School};
pub use teacher::Teacher;

/// An actor that runs to completion on its own thread.
pub trait Actor: Send + 'static {
    /// Final record handed back to the driver.
    type Record: Send + 'static;

    /// Name used for the thread and in log lines.
    fn name(&self) -> String;

    /// Run the protocol until the actor leaves the school.
    fn run(self) -> Result<Self::Record>;
}
