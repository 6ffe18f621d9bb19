//! Bounded retry orchestration
//!
//! State machine per payment, entirely in-process:
//!
//! ```text
//! Attempting(1) -fail-> wait 1×base -> Attempting(2) -fail-> ... -> Attempting(max) -fail-> Exhausted
//!       |                                   |                            |
//!       +--------------ok-------------------+-------------ok-------------+--> Succeeded
//! ```
//!
//! Entering `Attempting(n)` sets `retry_count = n`. Only the final `SUCCESS`
//! is persisted here. `FAILED` is persisted by the caller, which keeps
//! deciding the outcome separate from persisting the terminal failure.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::error::PaymentError;
use crate::payment::PaymentRecord;
use crate::ports::PaymentStore;
use crate::processor::{PaymentProcessor, ProcessingError};

/// Default attempt budget, inclusive of the first attempt
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff unit
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, counting the first one
    pub max_attempts: u32,
    /// Backoff unit; the wait after failed attempt `n` is `n × base_delay`
    pub base_delay: Duration,
    /// Upper bound on a single attempt. An attempt that overruns counts as failed
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            attempt_timeout: None,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy without an attempt timeout
    ///
    /// A `max_attempts` of 0 is raised to 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            attempt_timeout: None,
        }
    }

    /// Sets the per-attempt timeout
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Wait inserted after failed attempt `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// How the retry loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    /// An attempt succeeded and `SUCCESS` was persisted
    Succeeded { attempts: u32 },
    /// Every attempt failed; `reason` describes the last failure
    Exhausted { attempts: u32, reason: String },
}

/// Drives the bounded attempt loop for one payment
#[derive(Clone)]
pub struct RetryOrchestrator {
    store: Arc<dyn PaymentStore>,
    processor: Arc<dyn PaymentProcessor>,
    policy: RetryPolicy,
}

impl RetryOrchestrator {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        processor: Arc<dyn PaymentProcessor>,
        policy: RetryPolicy,
    ) -> Self {
        Self { store, processor, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs attempts sequentially until one succeeds or the budget is spent
    ///
    /// The payment must be `INITIATED`. On return `retry_count` equals the
    /// number of attempts made.
    ///
    /// # Errors
    ///
    /// `PaymentError::InvalidStatusTransition` if the payment is already terminal
    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    pub async fn run(&self, payment: &mut PaymentRecord) -> Result<RetryOutcome, PaymentError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<ProcessingError> = None;

        for attempt in 1..=max_attempts {
            payment.begin_attempt(attempt)?;
            info!(attempt, max_attempts, "Processing payment attempt");

            match self.execute(payment).await {
                Ok(()) => {
                    payment.mark_succeeded()?;
                    if let Err(e) = self.store.update(payment).await {
                        error!(error = %e, "Failed to persist successful payment");
                    }
                    return Ok(RetryOutcome::Succeeded { attempts: attempt });
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Payment attempt failed");
                    last_error = Some(e);

                    if attempt < max_attempts {
                        let delay = self.policy.backoff_for(attempt);
                        debug!(attempt, delay_ms = delay.as_millis() as u64, "Backing off before next attempt");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        let last = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt was made".to_string());

        Ok(RetryOutcome::Exhausted {
            attempts: max_attempts,
            reason: format!("payment failed after {} attempts: {}", max_attempts, last),
        })
    }

    async fn execute(&self, payment: &PaymentRecord) -> Result<(), ProcessingError> {
        match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.processor.attempt(payment))
                .await
                .unwrap_or_else(|_| Err(ProcessingError::AttemptTimedOut(limit.as_millis() as u64))),
            None => self.processor.attempt(payment).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(100));
        assert!(policy.attempt_timeout.is_none());
    }

    #[test]
    fn test_backoff_is_linear_and_increasing() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        let delays: Vec<_> = (1..=4).map(|n| policy.backoff_for(n)).collect();

        assert_eq!(delays[0], Duration::from_millis(100));
        assert_eq!(delays[1], Duration::from_millis(200));
        assert_eq!(delays[2], Duration::from_millis(300));
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_attempts_raised_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
    }
}
