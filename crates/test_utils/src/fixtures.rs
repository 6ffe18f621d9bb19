//! Pre-built Test Fixtures

use std::sync::Arc;
use std::time::Duration;

use domain_payment::mock::{InMemoryPaymentStore, ScriptedProcessor};
use domain_payment::{CreatePaymentRequest, PaymentService, RetryPolicy};

/// Fixture for payment requests
pub struct RequestFixtures;

impl RequestFixtures {
    /// The canonical request: key `k1`, 10000 INR, user `u1`
    pub fn inr_10000() -> CreatePaymentRequest {
        CreatePaymentRequest {
            idempotency_key: "k1".to_string(),
            amount: Some(10_000),
            currency: "INR".to_string(),
            user_id: "u1".to_string(),
        }
    }

    /// Negative amount, rejected by validation
    pub fn negative_amount() -> CreatePaymentRequest {
        CreatePaymentRequest { amount: Some(-500), ..Self::inr_10000() }
    }

    /// No amount at all
    pub fn missing_amount() -> CreatePaymentRequest {
        CreatePaymentRequest { amount: None, ..Self::inr_10000() }
    }
}

/// A `PaymentService` wired to in-memory test doubles
pub struct InMemoryHarness {
    pub service: PaymentService,
    pub store: Arc<InMemoryPaymentStore>,
    pub processor: Arc<ScriptedProcessor>,
}

impl InMemoryHarness {
    /// Builds a harness with the given processor and policy
    pub fn new(processor: ScriptedProcessor, policy: RetryPolicy) -> Self {
        let store = Arc::new(InMemoryPaymentStore::new());
        let processor = Arc::new(processor);
        let service = PaymentService::new(store.clone(), processor.clone(), policy);
        Self { service, store, processor }
    }

    /// Harness whose gateway always succeeds, with no backoff delay
    pub fn succeeding() -> Self {
        Self::new(ScriptedProcessor::always_succeed(), Self::instant_policy(3))
    }

    /// Policy with `max_attempts` and zero backoff
    pub fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }
}
