//! Progress callbacks for a batch run

use tracing::{info, warn};

use crate::error::Error;
use crate::types::{BatchHandle, ResultRecord};

/// Receives lifecycle events while a batch is driven to completion.
///
/// Every method has an empty default, so implementors pick the events they
/// care about.
pub trait BatchObserver: Send + Sync {
    /// The batch was accepted upstream.
    fn on_submitted(&self, handle: &BatchHandle) {
        let _ = handle;
    }

    /// A status snapshot arrived from a poll.
    fn on_status(&self, handle: &BatchHandle) {
        let _ = handle;
    }

    /// Results were downloaded and parsed.
    fn on_results(&self, records: &[ResultRecord]) {
        let _ = records;
    }

    /// A poll failed after exhausting its retries; polling stops.
    fn on_poll_error(&self, error: &Error) {
        let _ = error;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Observer that reports every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl BatchObserver for LoggingObserver {
    fn on_submitted(&self, handle: &BatchHandle) {
        info!(
            batch_id = %handle.batch_id,
            status = %handle.status,
            total = handle.total(),
            "Batch created"
        );
    }

    fn on_status(&self, handle: &BatchHandle) {
        info!(
            batch_id = %handle.batch_id,
            status = %handle.status,
            processing = handle.counts.processing,
            succeeded = handle.counts.succeeded,
            errored = handle.counts.errored,
            progress = format!("{:.1}%", handle.progress() * 100.0),
            "Batch status"
        );
    }

    fn on_results(&self, records: &[ResultRecord]) {
        let succeeded = records.iter().filter(|r| r.is_success()).count();
        info!(
            count = records.len(),
            succeeded,
            "Batch results ready"
        );
    }

    fn on_poll_error(&self, error: &Error) {
        warn!(error = %error, "Polling stopped due to error");
    }
}
