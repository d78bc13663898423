//! Resource state poller
//!
//! Cloud provisioning is asynchronous: a create call returns long before the
//! resource is usable. [`StateChangeConf`] repeatedly invokes a refresh
//! function until the observed state tag reaches a target, hits the failure
//! tag, or the deadline passes.
//!
//! # Example
//!
//! ```ignore
//! use oscflow_cloud::{Refresh, StateChangeConf};
//! use std::time::Duration;
//!
//! let conf = StateChangeConf::new(&["pending"], &["available"], Duration::from_secs(600))
//!     .fail_state("failed")
//!     .min_interval(Duration::from_secs(30));
//!
//! let service = conf
//!     .wait_for_state(&id, || async {
//!         let found = read_internet_service(&client, &id).await?;
//!         Ok(match found {
//!             Some(s) => Refresh::observed(s.state.clone().unwrap_or_default(), s),
//!             None => Refresh::NotFound,
//!         })
//!     })
//!     .await?;
//! ```

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, warn};

const INITIAL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_NOT_FOUND_CHECKS: u32 = 20;

/// Result of one refresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh<T> {
    /// The resource was observed in `state`
    Observed { state: String, payload: T },
    /// The resource is not observable (yet)
    NotFound,
}

impl<T> Refresh<T> {
    pub fn observed(state: impl Into<String>, payload: T) -> Self {
        Refresh::Observed {
            state: state.into(),
            payload,
        }
    }
}

/// Configuration of one convergence wait.
///
/// `pending`, `target` and `fail_state` must be disjoint. Any state outside
/// all three aborts the wait with [`CloudError::UnexpectedState`].
#[derive(Debug, Clone)]
pub struct StateChangeConf {
    /// States that mean "keep waiting"
    pub pending: Vec<String>,

    /// States that mean "done"
    pub target: Vec<String>,

    /// State that means "stop with an error"
    pub fail_state: Option<String>,

    /// Maximum wall-clock time measured from the first attempt; a refresh
    /// still running at the deadline is cancelled
    pub timeout: Duration,

    /// Sleep before the first attempt
    pub delay: Duration,

    /// Floor of the interval between attempts
    pub min_interval: Duration,

    /// Fixed interval between attempts, raised to `min_interval`; disables
    /// backoff when set
    pub poll_interval: Option<Duration>,

    /// Cap for the exponential backoff
    pub max_interval: Duration,

    /// Consecutive "not found" observations that end the wait
    pub not_found_checks: u32,
}

impl Default for StateChangeConf {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            target: Vec::new(),
            fail_state: None,
            timeout: Duration::from_secs(300),
            delay: Duration::ZERO,
            min_interval: Duration::ZERO,
            poll_interval: None,
            max_interval: DEFAULT_MAX_INTERVAL,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
        }
    }
}

impl StateChangeConf {
    pub fn new(pending: &[&str], target: &[&str], timeout: Duration) -> Self {
        Self {
            pending: pending.iter().map(|s| s.to_string()).collect(),
            target: target.iter().map(|s| s.to_string()).collect(),
            timeout,
            ..Self::default()
        }
    }

    pub fn fail_state(mut self, state: impl Into<String>) -> Self {
        self.fail_state = Some(state.into());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn not_found_checks(mut self, checks: u32) -> Self {
        self.not_found_checks = checks;
        self
    }

    /// Check that the state sets are disjoint and a target exists.
    pub fn validate(&self) -> Result<()> {
        if self.target.is_empty() {
            return Err(CloudError::InvalidConfig(
                "state change requires at least one target state".to_string(),
            ));
        }
        if let Some(state) = self.pending.iter().find(|p| self.target.contains(p)) {
            return Err(CloudError::InvalidConfig(format!(
                "state '{}' is both pending and target",
                state
            )));
        }
        if let Some(fail) = &self.fail_state {
            if self.pending.contains(fail) || self.target.contains(fail) {
                return Err(CloudError::InvalidConfig(format!(
                    "fail state '{}' overlaps pending or target states",
                    fail
                )));
            }
        }
        Ok(())
    }

    fn initial_interval(&self) -> Duration {
        match self.poll_interval {
            Some(interval) => interval.max(self.min_interval),
            None => INITIAL_INTERVAL.max(self.min_interval),
        }
    }

    /// Interval to use after `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        match self.poll_interval {
            Some(interval) => interval.max(self.min_interval),
            None => {
                let cap = self.max_interval.max(self.min_interval);
                current.saturating_mul(2).min(cap)
            }
        }
    }

    /// Poll `refresh` until the resource converges.
    ///
    /// `resource_id` only labels logs and errors.
    pub async fn wait_for_state<T, F, Fut>(&self, resource_id: &str, mut refresh: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Refresh<T>>>,
    {
        self.validate()?;

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let deadline = Instant::now() + self.timeout;
        let mut interval = self.initial_interval();
        let mut last_state = String::new();
        let mut not_found = 0u32;
        let mut attempt = 0u32;

        let timed_out = |last_state: String| CloudError::Timeout {
            resource_id: resource_id.to_string(),
            last_state,
            timeout: self.timeout,
        };

        loop {
            attempt += 1;

            let Ok(outcome) = timeout_at(deadline, refresh()).await else {
                warn!("{}: attempt {} cut off at the deadline", resource_id, attempt);
                return Err(timed_out(last_state));
            };

            match outcome {
                Ok(Refresh::Observed { state, payload }) => {
                    not_found = 0;
                    debug!(
                        "{}: attempt {} observed state '{}'",
                        resource_id, attempt, state
                    );

                    if self.fail_state.as_deref() == Some(state.as_str()) {
                        return Err(CloudError::FailState { state });
                    }
                    if self.target.contains(&state) {
                        return Ok(payload);
                    }
                    if !self.pending.contains(&state) {
                        return Err(CloudError::UnexpectedState {
                            state,
                            expected: self.target.join(", "),
                        });
                    }
                    last_state = state;
                }
                Ok(Refresh::NotFound) => {
                    not_found += 1;
                    debug!(
                        "{}: attempt {} not found ({}/{})",
                        resource_id, attempt, not_found, self.not_found_checks
                    );
                    if not_found >= self.not_found_checks {
                        return Err(CloudError::ResourceNotFound(format!(
                            "{} still missing after {} checks",
                            resource_id, not_found
                        )));
                    }
                }
                Err(e) if e.kind().is_transient() => {
                    warn!("{}: attempt {} throttled: {}", resource_id, attempt, e);
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(timed_out(last_state));
            }

            sleep(interval.min(deadline - now)).await;
            interval = self.next_interval(interval);
        }
    }
}
