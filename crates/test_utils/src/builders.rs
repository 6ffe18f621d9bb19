//! Test Data Builders
//!
//! Builders for requests and records with sensible defaults, so tests only
//! spell out the fields they care about.

use fake::faker::internet::en::Username;
use fake::Fake;
use uuid::Uuid;

use domain_payment::{CreatePaymentRequest, NewPayment, PaymentRecord, PaymentStatus};

/// Builder for payment-creation requests
///
/// Defaults to a valid request with a fresh idempotency key and a fake user.
pub struct CreatePaymentRequestBuilder {
    request: CreatePaymentRequest,
}

impl Default for CreatePaymentRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreatePaymentRequestBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            request: CreatePaymentRequest {
                idempotency_key: format!("idem-{}", Uuid::new_v4()),
                amount: Some(10_000),
                currency: "USD".to_string(),
                user_id: Username().fake(),
            },
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.request.idempotency_key = key.into();
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.request.amount = Some(amount);
        self
    }

    pub fn without_amount(mut self) -> Self {
        self.request.amount = None;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.request.currency = currency.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.request.user_id = user_id.into();
        self
    }

    /// Builds the request
    pub fn build(self) -> CreatePaymentRequest {
        self.request
    }
}

/// Builder for stored payment records in a given state
pub struct PaymentRecordBuilder {
    new_payment: NewPayment,
    status: PaymentStatus,
    attempts: u32,
    failure_reason: String,
}

impl Default for PaymentRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentRecordBuilder {
    /// Creates a builder for an `INITIATED` record
    pub fn new() -> Self {
        Self {
            new_payment: NewPayment {
                idempotency_key: format!("idem-{}", Uuid::new_v4()),
                amount: 10_000,
                currency: "USD".to_string(),
                user_id: Username().fake(),
            },
            status: PaymentStatus::Initiated,
            attempts: 0,
            failure_reason: "payment gateway timeout".to_string(),
        }
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.new_payment.idempotency_key = key.into();
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.new_payment.amount = amount;
        self
    }

    /// Record settled after `attempts` attempts
    pub fn succeeded_after(mut self, attempts: u32) -> Self {
        self.status = PaymentStatus::Success;
        self.attempts = attempts.max(1);
        self
    }

    /// Record failed after `attempts` attempts
    pub fn failed_after(mut self, attempts: u32, reason: impl Into<String>) -> Self {
        self.status = PaymentStatus::Failed;
        self.attempts = attempts.max(1);
        self.failure_reason = reason.into();
        self
    }

    /// Builds the record by driving it through its real lifecycle
    ///
    /// # Panics
    ///
    /// Never for the states this builder can describe
    pub fn build(self) -> PaymentRecord {
        let mut record = PaymentRecord::initiate(self.new_payment);
        for attempt in 1..=self.attempts {
            record.begin_attempt(attempt).expect("fresh record accepts attempts");
        }
        match self.status {
            PaymentStatus::Initiated => {}
            PaymentStatus::Success => record.mark_succeeded().expect("INITIATED -> SUCCESS"),
            PaymentStatus::Failed => record
                .mark_failed(self.failure_reason)
                .expect("INITIATED -> FAILED"),
        }
        record
    }
}
