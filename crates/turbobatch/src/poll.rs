//! Status polling
//!
//! Two layers:
//!
//! - [`poll_batch_status`] makes one logical status poll, retrying transient
//!   failures with capped exponential backoff.
//! - [`PollScheduler`] repeats that poll on a fixed interval until the batch
//!   reaches a terminal status or the poll cap is hit.
//!
//! All waiting goes through a [`Sleeper`], so both layers run instantly under
//! test.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use turbobatch_core::clock::Sleeper;
use turbobatch_core::retry::{BackoffStrategy, ExponentialBackoff};

use crate::client::BatchClient;
use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::observer::BatchObserver;
use crate::types::{BatchHandle, BatchId};

/// Backoff for a single status poll.
///
/// Retries [`Error::Upstream`] and transport failures; anything else
/// (a malformed batch id in the response, for instance) fails immediately.
/// The delay after failed attempt `i` (0-indexed) is
/// `min(1000·2^i + U[0, 1000), 10000)` ms.
#[derive(Debug, Clone)]
pub struct PollRetryPolicy {
    backoff: ExponentialBackoff,
}

impl PollRetryPolicy {
    /// Policy allowing `retry_count` attempts in total.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when `retry_count` is zero.
    pub fn new(retry_count: u32) -> Result<Self> {
        if retry_count == 0 {
            return Err(Error::validation(
                "retry_count",
                "Retry count must be at least 1",
            ));
        }

        Ok(Self {
            backoff: ExponentialBackoff::builder()
                .max_retries(retry_count - 1)
                .initial_delay(Duration::from_secs(1))
                .multiplier(2.0)
                .jitter(Duration::from_secs(1))
                .max_delay(Duration::from_secs(10))
                .build(),
        })
    }

    /// Total attempts this policy allows.
    pub fn attempts(&self) -> u32 {
        self.backoff.max_retries() + 1
    }
}

impl BackoffStrategy for PollRetryPolicy {
    fn should_retry(&self, error: &(dyn StdError + 'static), _attempt: u32) -> bool {
        error
            .downcast_ref::<Error>()
            .is_none_or(Error::is_retryable)
    }

    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        self.backoff.next_delay(attempt)
    }

    fn max_retries(&self) -> u32 {
        self.backoff.max_retries()
    }
}

/// Fetch the status of a batch, retrying transient failures.
///
/// Makes up to `retry_count` calls. Success returns at once, whatever the
/// batch status; the error of the final failed attempt is returned otherwise.
pub async fn poll_batch_status(
    client: &BatchClient,
    batch_id: &BatchId,
    retry_count: u32,
    sleeper: &dyn Sleeper,
) -> Result<BatchHandle> {
    let policy = PollRetryPolicy::new(retry_count)?;
    policy.execute(sleeper, || client.retrieve(batch_id)).await
}

/// Where a [`PollScheduler`] stands.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Not polled yet
    Idle,
    /// Polled `polls` times, batch still running
    Polling {
        /// Number of completed polls
        polls: u32,
    },
    /// The batch reached a terminal status
    Terminal(BatchHandle),
    /// The poll cap was reached before a terminal status
    Exhausted(BatchHandle),
}

impl PollState {
    /// Whether the scheduler will make no further polls.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Terminal(_) | Self::Exhausted(_))
    }

    /// The outcome of a finished state, `None` while polling can continue.
    pub fn finish(&self) -> Option<PollFinish> {
        match self {
            Self::Terminal(handle) => Some(PollFinish::Terminal(handle.clone())),
            Self::Exhausted(handle) => Some(PollFinish::Exhausted(handle.clone())),
            Self::Idle | Self::Polling { .. } => None,
        }
    }
}

/// How a [`PollScheduler::run`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollFinish {
    /// The batch reached a terminal status
    Terminal(BatchHandle),
    /// The poll cap was reached first; carries the last snapshot
    Exhausted(BatchHandle),
}

impl PollFinish {
    /// The last snapshot of the batch.
    pub fn handle(&self) -> &BatchHandle {
        match self {
            Self::Terminal(handle) | Self::Exhausted(handle) => handle,
        }
    }
}

/// Interval-driven poller for one batch.
///
/// ```text
/// Idle -> Polling{polls} -> Terminal(handle)
///                        -> Exhausted(handle)
/// ```
///
/// A batch that is already terminal when the scheduler is created starts in
/// `Terminal` and is never polled.
#[derive(Debug)]
pub struct PollScheduler {
    client: BatchClient,
    sleeper: Arc<dyn Sleeper>,
    config: PollConfig,
    state: PollState,
    latest: BatchHandle,
}

impl PollScheduler {
    /// Scheduler for the batch described by `initial`.
    pub fn new(
        client: BatchClient,
        sleeper: Arc<dyn Sleeper>,
        config: PollConfig,
        initial: BatchHandle,
    ) -> Self {
        let state = if initial.is_terminal() {
            PollState::Terminal(initial.clone())
        } else {
            PollState::Idle
        };

        Self {
            client,
            sleeper,
            config,
            state,
            latest: initial,
        }
    }

    /// Current state.
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Most recent snapshot of the batch.
    pub fn latest(&self) -> &BatchHandle {
        &self.latest
    }

    /// Wait one interval and poll once.
    ///
    /// A finished scheduler returns its state without sleeping or polling.
    /// On error the state is left unchanged.
    pub async fn tick(&mut self) -> Result<&PollState> {
        let polls = match self.state {
            PollState::Terminal(_) | PollState::Exhausted(_) => return Ok(&self.state),
            PollState::Idle => 0,
            PollState::Polling { polls } => polls,
        };

        if polls >= self.config.max_polls {
            info!(polls, "Polling stopped: maximum attempts reached");
            self.state = PollState::Exhausted(self.latest.clone());
            return Ok(&self.state);
        }

        self.sleeper.sleep(self.config.interval).await;

        let batch_id = self.latest.batch_id.clone();
        let handle = poll_batch_status(
            &self.client,
            &batch_id,
            self.config.retry_count,
            self.sleeper.as_ref(),
        )
        .await?;

        if handle.batch_id != batch_id {
            return Err(Error::Upstream {
                status: 200,
                message: format!(
                    "Poll for {} returned batch {}",
                    batch_id, handle.batch_id
                ),
            });
        }

        let polls = polls + 1;
        debug!(polls, status = %handle.status, "Poll completed");

        self.state = if handle.is_terminal() {
            info!(status = %handle.status, "Polling stopped: batch is terminal");
            PollState::Terminal(handle.clone())
        } else if polls >= self.config.max_polls {
            info!(polls, "Polling stopped: maximum attempts reached");
            PollState::Exhausted(handle.clone())
        } else {
            PollState::Polling { polls }
        };
        self.latest = handle;

        Ok(&self.state)
    }

    /// Poll until finished, reporting every snapshot to `observer`.
    ///
    /// A failed poll is reported through
    /// [`on_poll_error`](BatchObserver::on_poll_error) and returned.
    pub async fn run(&mut self, observer: &dyn BatchObserver) -> Result<PollFinish> {
        loop {
            if let Some(finish) = self.state.finish() {
                return Ok(finish);
            }

            let before = self.polls();
            match self.tick().await {
                Ok(_) => {
                    if self.polls() != before || self.state.is_finished() {
                        observer.on_status(&self.latest);
                    }
                }
                Err(e) => {
                    observer.on_poll_error(&e);
                    return Err(e);
                }
            }
        }
    }

    fn polls(&self) -> Option<u32> {
        match self.state {
            PollState::Polling { polls } => Some(polls),
            _ => None,
        }
    }
}
