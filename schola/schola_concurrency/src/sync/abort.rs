//! Run-wide abort flag.
//!
//! A failure in one actor leaves the shared counters untrustworthy for all
//! of them. The failing actor raises the signal; every other actor notices
//! it at its next bounded wait and unwinds.

use std::sync::atomic::{AtomicBool, Ordering};

use schola_core::error::SyncError;

/// A flag that is raised once and never lowered.
#[derive(Debug, Default)]
pub struct AbortSignal {
    flag: AtomicBool,
}

impl AbortSignal {
    /// Create a lowered signal.
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Raise the signal.
    ///
    /// Returns true if the signal was raised by this call, false if it was
    /// already raised.
    pub fn raise(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    /// Whether the signal has been raised.
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with `SyncError::Aborted` once the signal is raised.
    pub fn check(&self) -> Result<(), SyncError> {
        if self.is_raised() {
            Err(SyncError::Aborted)
        } else {
            Ok(())
        }
    }
}
