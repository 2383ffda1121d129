//! Batch lifecycle orchestration
//!
//! Build → submit → poll → (on `ended`) fetch results, reporting each step to a
//! [`BatchObserver`].

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use turbobatch_core::clock::{Sleeper, TokioSleeper};

use crate::builder::{build_requests, validate_records};
use crate::client::BatchClient;
use crate::config::{PollConfig, SubmissionConfig};
use crate::error::Result;
use crate::observer::BatchObserver;
use crate::poll::{PollFinish, PollScheduler};
use crate::session::SessionState;
use crate::types::{BatchHandle, BatchRequest, InputRecord, ProcessingStatus, ResultRecord};

/// How a batch run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The batch ended and its results were retrieved
    Completed {
        /// Final snapshot
        handle: BatchHandle,
        /// Results in result-stream order
        results: Vec<ResultRecord>,
    },
    /// The batch reached a terminal status other than `ended`; no results
    Stopped {
        /// Final snapshot
        handle: BatchHandle,
    },
    /// The poll cap was reached while the batch was still running
    PollLimitReached {
        /// Last snapshot seen
        handle: BatchHandle,
    },
}

impl BatchOutcome {
    /// The last batch snapshot.
    pub fn handle(&self) -> &BatchHandle {
        match self {
            Self::Completed { handle, .. }
            | Self::Stopped { handle }
            | Self::PollLimitReached { handle } => handle,
        }
    }

    /// Results, when the batch completed.
    pub fn results(&self) -> Option<&[ResultRecord]> {
        match self {
            Self::Completed { results, .. } => Some(results),
            _ => None,
        }
    }
}

/// Drives one batch from input records to results.
///
/// ```rust,no_run
/// # use turbobatch::{BatchRunner, InputRecord, LoggingObserver, SubmissionConfig};
/// # async fn example(config: SubmissionConfig) -> turbobatch::Result<()> {
/// let runner = BatchRunner::new(&config)?;
/// let records = vec![InputRecord::anonymous("Summarize the Rust book in one line.")];
///
/// let outcome = runner.run(&config, &records, &LoggingObserver).await?;
/// if let Some(results) = outcome.results() {
///     turbobatch::export::write_csv_file(results, "results.csv")?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    client: BatchClient,
    sleeper: Arc<dyn Sleeper>,
    poll: PollConfig,
    session: SessionState,
}

impl BatchRunner {
    /// Runner talking to the endpoint in `config`, sleeping on the tokio clock.
    ///
    /// The configuration is validated first, so a blank endpoint is reported
    /// as such rather than as a URL parse failure.
    pub fn new(config: &SubmissionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_client(BatchClient::new(config)?, Arc::new(TokioSleeper)))
    }

    /// Runner over an existing client and clock.
    pub fn with_client(client: BatchClient, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            client,
            sleeper,
            poll: PollConfig::default(),
            session: SessionState::new(),
        }
    }

    /// Override the polling schedule.
    pub fn poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Share a session with other runners.
    pub fn session(mut self, session: SessionState) -> Self {
        self.session = session;
        self
    }

    /// The client used for every call.
    pub fn client(&self) -> &BatchClient {
        &self.client
    }

    /// Submit `records` as one batch and follow it to the end.
    ///
    /// Validation failures return before any network call. A failed poll
    /// stops the run and is returned after being reported to the observer.
    pub async fn run(
        &self,
        config: &SubmissionConfig,
        records: &[InputRecord],
        observer: &dyn BatchObserver,
    ) -> Result<BatchOutcome> {
        let requests = build_requests(records, config)?;
        validate_records(records)?;

        let handle = {
            let _guard = self.session.begin_submission()?;
            self.client.submit(&requests).await?
        };
        observer.on_submitted(&handle);

        self.follow(handle, Some(&requests), observer).await
    }

    /// Follow an already submitted batch until it finishes.
    ///
    /// When `requests` is known, results whose `custom_id` was not submitted
    /// are dropped.
    pub async fn follow(
        &self,
        handle: BatchHandle,
        requests: Option<&[BatchRequest]>,
        observer: &dyn BatchObserver,
    ) -> Result<BatchOutcome> {
        let mut scheduler = PollScheduler::new(
            self.client.clone(),
            Arc::clone(&self.sleeper),
            self.poll,
            handle,
        );

        let handle = match scheduler.run(observer).await? {
            PollFinish::Terminal(handle) => handle,
            PollFinish::Exhausted(handle) => {
                warn!(batch_id = %handle.batch_id, "Batch still running after maximum polls");
                return Ok(BatchOutcome::PollLimitReached { handle });
            }
        };

        if handle.status != ProcessingStatus::Ended {
            info!(batch_id = %handle.batch_id, status = %handle.status, "Batch finished without results");
            return Ok(BatchOutcome::Stopped { handle });
        }

        self.sleeper.sleep(self.poll.results_delay).await;
        let mut results = self.client.results(&handle.batch_id).await?;
        if let Some(requests) = requests {
            results = retain_submitted(results, requests);
        }
        observer.on_results(&results);

        Ok(BatchOutcome::Completed { handle, results })
    }
}

/// Drop results whose `custom_id` does not belong to the submitted requests.
pub fn retain_submitted(results: Vec<ResultRecord>, requests: &[BatchRequest]) -> Vec<ResultRecord> {
    let known: HashSet<&str> = requests.iter().map(|r| r.custom_id.as_str()).collect();

    results
        .into_iter()
        .filter(|record| {
            let keep = known.contains(record.custom_id.as_str());
            if !keep {
                warn!(custom_id = %record.custom_id, "Skipping result for unknown request");
            }
            keep
        })
        .collect()
}
