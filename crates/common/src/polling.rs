//! Bounded polling for asynchronous task completion.
//!
//! Mutating calls against the service return immediately with a pending
//! handle; completion can only be observed by re-fetching the status until a
//! terminal state appears. [`StatusPoller`] owns that loop: it drives an
//! injected fetch primitive under a caller-supplied timeout/interval budget,
//! and a [`CancellationToken`] aborts the wait mid-sleep.
//!
//! "Not yet done" is a value ([`Progress::Pending`]), never an error. Only
//! budget exhaustion, cancellation, and fetch failures propagate as errors,
//! and a fetch failure propagates immediately: polling is bounded
//! repetition, not a retry mechanism.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Default wait budget.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default pause between consecutive status fetches.
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of classifying a status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<S> {
    /// The snapshot is not terminal; keep polling
    Pending,
    /// The snapshot is terminal; hand it back to the caller
    Terminal(S),
}

/// Errors raised while waiting on a status.
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// Fetching the current snapshot failed; surfaced immediately
    #[error("{0}")]
    Fetch(E),

    /// The wait budget ran out before a terminal status was observed.
    /// The underlying operation may still complete on the service side.
    #[error("'{id}' did not reach a terminal status within {timeout:?}")]
    TimedOut {
        /// Identifier that was being awaited
        id: String,
        /// Budget that was exhausted
        timeout: Duration,
    },

    /// The cancellation signal fired while waiting
    #[error("wait on '{id}' was cancelled")]
    Cancelled {
        /// Identifier that was being awaited
        id: String,
    },
}

/// Generic bounded waiter over a "fetch current status" primitive.
///
/// The same poller drives every pollable resource kind; only the fetch and
/// classify closures differ per resource. Independent waits share nothing
/// and may run concurrently.
#[derive(Debug, Clone, Default)]
pub struct StatusPoller {
    timeout: Option<Duration>,
    interval: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl StatusPoller {
    /// Create a poller with the default budget (5 s timeout, 50 ms interval).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total wait budget.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the pause between consecutive fetches.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Attach a cancellation signal that aborts the wait mid-sleep.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Poll until `classify` reports a terminal snapshot.
    ///
    /// The first fetch happens immediately; a snapshot that is already
    /// terminal returns without any sleep. Afterwards the loop checks the
    /// deadline, then sleeps one interval (or aborts on cancellation) before
    /// fetching again.
    pub async fn wait_until_terminal<S, E, F, Fut, C>(
        &self,
        id: impl fmt::Display,
        mut fetch: F,
        classify: C,
    ) -> Result<S, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<S, E>>,
        C: Fn(S) -> Progress<S>,
    {
        let id = id.to_string();
        let timeout = self.timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT);
        let interval = self.interval.unwrap_or(DEFAULT_WAIT_INTERVAL);
        let deadline = Instant::now() + timeout;

        loop {
            let snapshot = fetch().await.map_err(PollError::Fetch)?;

            match classify(snapshot) {
                Progress::Terminal(snapshot) => {
                    trace!(%id, "terminal status observed");
                    return Ok(snapshot);
                }
                Progress::Pending => {}
            }

            if Instant::now() >= deadline {
                debug!(%id, ?timeout, "wait budget exhausted");
                return Err(PollError::TimedOut { id, timeout });
            }

            match &self.cancellation {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!(%id, "wait cancelled");
                            return Err(PollError::Cancelled { id });
                        }
                        _ = sleep(interval) => {}
                    }
                }
                None => sleep(interval).await,
            }
        }
    }
}
