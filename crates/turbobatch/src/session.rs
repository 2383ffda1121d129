//! Submission session state

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Per-caller session state.
///
/// Tracks whether a submission is outstanding so that a second one cannot
/// start until the first finishes. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    submitting: Arc<AtomicBool>,
}

impl SessionState {
    /// Create a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is currently outstanding.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Claim the session for one submission.
    ///
    /// # Errors
    ///
    /// [`Error::SubmissionInFlight`] if another guard is alive.
    pub fn begin_submission(&self) -> Result<SubmissionGuard> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SubmissionInFlight)?;

        Ok(SubmissionGuard {
            flag: Arc::clone(&self.submitting),
        })
    }
}

/// Marks a submission as outstanding until dropped.
#[derive(Debug)]
#[must_use = "the submission is released as soon as the guard is dropped"]
pub struct SubmissionGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
