//! Structured logging for outbound HTTP calls
//!
//! Every batch API call is logged through [`CallLog`]. It records method,
//! path, sizes and timing only, never headers, so the API key cannot end up
//! in a log line.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One outbound call, from send to response or failure.
#[derive(Debug)]
pub struct CallLog {
    method: String,
    path: String,
    started: Instant,
}

impl CallLog {
    /// Log the call going out and start its clock.
    pub fn start(method: &str, path: &str, body_size: Option<usize>) -> Self {
        debug!(method, path, body_size, "Sending HTTP request");

        Self {
            method: method.to_string(),
            path: path.to_string(),
            started: Instant::now(),
        }
    }

    /// Time since [`CallLog::start`].
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Log a received response: `debug` for 2xx, `warn` otherwise.
    pub fn finished(&self, status: u16, body_size: usize) -> Duration {
        let elapsed = self.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;

        if (200..300).contains(&status) {
            debug!(method = %self.method, path = %self.path, status, elapsed_ms, body_size, "HTTP request succeeded");
        } else {
            warn!(method = %self.method, path = %self.path, status, elapsed_ms, body_size, "HTTP request returned error status");
        }
        elapsed
    }

    /// Log a call that never produced a response.
    pub fn failed(&self, error: &dyn std::error::Error) {
        warn!(
            method = %self.method,
            path = %self.path,
            elapsed_ms = self.elapsed().as_millis() as u64,
            error = %error,
            "HTTP request failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_measures_elapsed() {
        let call = CallLog::start("POST", "/messages/batches", Some(42));
        std::thread::sleep(Duration::from_millis(5));

        let elapsed = call.finished(200, 10);
        assert!(elapsed >= Duration::from_millis(5));
        assert!(call.elapsed() >= elapsed);
    }

    #[test]
    fn test_failed_accepts_any_error() {
        let call = CallLog::start("GET", "/messages/batches/msgbatch_1", None);
        call.failed(&std::io::Error::other("connection reset"));
        call.finished(529, 0);
    }
}
