//! Processing attempt executor
//!
//! One call to [`PaymentProcessor::attempt`] is one attempt against the
//! downstream gateway. It completes with a definitive success or failure
//! before returning.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use core_kernel::DomainPort;

use crate::payment::PaymentRecord;

/// Failure of a single processing attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("payment gateway timeout")]
    GatewayTimeout,

    #[error("payment declined: {0}")]
    Declined(String),

    #[error("attempt timed out after {0}ms")]
    AttemptTimedOut(u64),

    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

/// Downstream processor port
#[async_trait]
pub trait PaymentProcessor: DomainPort {
    /// Performs one attempt to settle the payment
    async fn attempt(&self, payment: &PaymentRecord) -> Result<(), ProcessingError>;
}

/// Decides whether a simulated attempt fails
///
/// Injected into [`SimulatedGateway`] so tests can force deterministic
/// outcomes.
pub trait FailureDecider: Send + Sync {
    fn should_fail(&self, payment: &PaymentRecord) -> bool;
}

impl<F> FailureDecider for F
where
    F: Fn(&PaymentRecord) -> bool + Send + Sync,
{
    fn should_fail(&self, payment: &PaymentRecord) -> bool {
        self(payment)
    }
}

/// Fails with a fixed probability, using its own random source
#[derive(Debug)]
pub struct RandomFailure {
    rate: f64,
    rng: Mutex<StdRng>,
}

impl RandomFailure {
    /// Creates a decider seeded from OS entropy
    ///
    /// `rate` is clamped to `[0, 1]`. NaN is treated as 0.
    pub fn new(rate: f64) -> Self {
        Self::with_rng(rate, StdRng::from_entropy())
    }

    /// Creates a reproducible decider
    pub fn seeded(rate: f64, seed: u64) -> Self {
        Self::with_rng(rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rate: f64, rng: StdRng) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self {
            rate,
            rng: Mutex::new(rng),
        }
    }

    /// The effective failure probability
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl FailureDecider for RandomFailure {
    fn should_fail(&self, _payment: &PaymentRecord) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_bool(self.rate)
    }
}

/// Stand-in for the real payment gateway
///
/// A failing attempt returns immediately with a gateway timeout. A
/// successful one takes `latency` to complete.
pub struct SimulatedGateway {
    decider: Arc<dyn FailureDecider>,
    latency: Duration,
}

impl SimulatedGateway {
    /// Creates a gateway with the given failure decider and processing delay
    pub fn new(decider: Arc<dyn FailureDecider>, latency: Duration) -> Self {
        Self { decider, latency }
    }

    /// Gateway failing at `rate` with a 50ms success latency
    pub fn with_failure_rate(rate: f64) -> Self {
        Self::new(Arc::new(RandomFailure::new(rate)), Duration::from_millis(50))
    }
}

impl DomainPort for SimulatedGateway {}

#[async_trait]
impl PaymentProcessor for SimulatedGateway {
    async fn attempt(&self, payment: &PaymentRecord) -> Result<(), ProcessingError> {
        if self.decider.should_fail(payment) {
            return Err(ProcessingError::GatewayTimeout);
        }

        debug!(payment_id = %payment.id, latency_ms = self.latency.as_millis() as u64, "Simulating gateway processing");
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::NewPayment;

    fn payment() -> PaymentRecord {
        PaymentRecord::initiate(NewPayment {
            idempotency_key: "k1".to_string(),
            amount: 100,
            currency: "USD".to_string(),
            user_id: "u1".to_string(),
        })
    }

    #[test]
    fn test_random_failure_extremes() {
        let never = RandomFailure::seeded(0.0, 7);
        let always = RandomFailure::seeded(1.0, 7);
        let p = payment();

        assert!((0..100).all(|_| !never.should_fail(&p)));
        assert!((0..100).all(|_| always.should_fail(&p)));
    }

    #[test]
    fn test_random_failure_rate_is_clamped() {
        assert_eq!(RandomFailure::seeded(1.5, 1).rate(), 1.0);
        assert_eq!(RandomFailure::seeded(-0.2, 1).rate(), 0.0);
        assert_eq!(RandomFailure::seeded(f64::NAN, 1).rate(), 0.0);
    }

    #[test]
    fn test_seeded_deciders_are_reproducible() {
        let a = RandomFailure::seeded(0.5, 42);
        let b = RandomFailure::seeded(0.5, 42);
        let p = payment();

        let left: Vec<bool> = (0..32).map(|_| a.should_fail(&p)).collect();
        let right: Vec<bool> = (0..32).map(|_| b.should_fail(&p)).collect();
        assert_eq!(left, right);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_uses_injected_decider() {
        let failing = SimulatedGateway::new(Arc::new(|_: &PaymentRecord| true), Duration::from_millis(50));
        assert_eq!(failing.attempt(&payment()).await, Err(ProcessingError::GatewayTimeout));

        let passing = SimulatedGateway::new(Arc::new(|_: &PaymentRecord| false), Duration::from_millis(50));
        let start = tokio::time::Instant::now();
        assert_eq!(passing.attempt(&payment()).await, Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
