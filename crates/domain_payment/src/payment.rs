//! Payment record and lifecycle
//!
//! A `PaymentRecord` is created `INITIATED` and moves to exactly one
//! terminal status. Every mutation advances `updated_at`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::PaymentId;

use crate::error::PaymentError;

/// Payment status
///
/// ```text
/// INITIATED -> SUCCESS
///           -> FAILED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Accepted and being processed
    Initiated,
    /// Settled by the gateway
    Success,
    /// All attempts exhausted
    Failed,
}

impl PaymentStatus {
    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "INITIATED",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
        }
    }

    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        match self {
            PaymentStatus::Initiated => false,
            PaymentStatus::Success | PaymentStatus::Failed => true,
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Initiated, Success) | (Initiated, Failed))
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound payment-creation request, as received from the caller
///
/// Nothing here is trusted. `PaymentValidator` turns it into a `NewPayment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Caller-supplied de-duplication token
    pub idempotency_key: String,
    /// Amount in minor currency units
    pub amount: Option<i64>,
    /// ISO 4217 currency code
    pub currency: String,
    /// Payer
    pub user_id: String,
}

/// A request that passed every validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub idempotency_key: String,
    pub amount: i64,
    pub currency: String,
    pub user_id: String,
}

/// The unit of durable payment state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier
    pub id: PaymentId,
    /// Payer
    pub user_id: String,
    /// Amount in minor currency units
    pub amount: i64,
    /// Currency code
    pub currency: String,
    /// Status
    pub status: PaymentStatus,
    /// Unique across all records
    pub idempotency_key: String,
    /// Number of processing attempts made so far
    pub retry_count: u32,
    /// Last failure, present only when `FAILED`
    pub failure_reason: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Creates a new `INITIATED` payment from a validated request
    pub fn initiate(new_payment: NewPayment) -> Self {
        let now = Utc::now();

        Self {
            id: PaymentId::new_v7(),
            user_id: new_payment.user_id,
            amount: new_payment.amount,
            currency: new_payment.currency,
            status: PaymentStatus::Initiated,
            idempotency_key: new_payment.idempotency_key,
            retry_count: 0,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records the start of processing attempt `attempt` (1-based)
    pub fn begin_attempt(&mut self, attempt: u32) -> Result<(), PaymentError> {
        if self.status.is_terminal() {
            return Err(PaymentError::InvalidStatusTransition {
                from: self.status,
                to: self.status,
            });
        }
        self.retry_count = attempt;
        self.touch();
        Ok(())
    }

    /// Marks the payment as settled
    pub fn mark_succeeded(&mut self) -> Result<(), PaymentError> {
        self.transition(PaymentStatus::Success)?;
        self.failure_reason = None;
        Ok(())
    }

    /// Marks the payment as failed with the last attempt's error
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), PaymentError> {
        self.transition(PaymentStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    fn transition(&mut self, target: PaymentStatus) -> Result<(), PaymentError> {
        if !self.status.can_transition_to(target) {
            return Err(PaymentError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        // updated_at is strictly monotone across mutations
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_payment() -> NewPayment {
        NewPayment {
            idempotency_key: "k1".to_string(),
            amount: 10_000,
            currency: "INR".to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_initiate() {
        let payment = PaymentRecord::initiate(new_payment());

        assert_eq!(payment.status, PaymentStatus::Initiated);
        assert_eq!(payment.retry_count, 0);
        assert!(payment.failure_reason.is_none());
        assert_eq!(payment.created_at, payment.updated_at);
    }

    #[test]
    fn test_success_is_terminal() {
        let mut payment = PaymentRecord::initiate(new_payment());
        payment.begin_attempt(1).unwrap();
        payment.mark_succeeded().unwrap();

        assert!(payment.mark_failed("late failure").is_err());
        assert!(payment.begin_attempt(2).is_err());
        assert_eq!(payment.status, PaymentStatus::Success);
        assert_eq!(payment.retry_count, 1);
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut payment = PaymentRecord::initiate(new_payment());
        payment.mark_failed("gateway timeout").unwrap();

        let err = payment.mark_succeeded().unwrap_err();
        assert!(matches!(
            err,
            PaymentError::InvalidStatusTransition {
                from: PaymentStatus::Failed,
                to: PaymentStatus::Success,
            }
        ));
        assert_eq!(payment.failure_reason.as_deref(), Some("gateway timeout"));
    }

    #[test]
    fn test_updated_at_advances_on_every_mutation() {
        let mut payment = PaymentRecord::initiate(new_payment());
        let created = payment.updated_at;

        payment.begin_attempt(1).unwrap();
        let after_attempt = payment.updated_at;
        assert!(after_attempt > created);

        payment.mark_succeeded().unwrap();
        assert!(payment.updated_at > after_attempt);
        assert_eq!(payment.created_at, created);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&PaymentStatus::Initiated).unwrap();
        assert_eq!(json, "\"INITIATED\"");
        let parsed: PaymentStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Failed);
    }

    #[test]
    fn test_no_transition_out_of_terminal() {
        for from in [PaymentStatus::Success, PaymentStatus::Failed] {
            for to in [PaymentStatus::Initiated, PaymentStatus::Success, PaymentStatus::Failed] {
                assert!(!from.can_transition_to(to), "{} -> {} must be rejected", from, to);
            }
        }
    }
}
