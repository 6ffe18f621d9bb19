//! Custom Test Assertions
//!
//! Assertion helpers for payments that give more meaningful failure
//! messages than plain `assert_eq!`.

use domain_payment::{PaymentRecord, PaymentStatus};

/// Asserts that a payment settled after exactly `attempts` attempts
///
/// # Panics
///
/// Panics if the status is not `SUCCESS`, the attempt count differs or a
/// failure reason is present
pub fn assert_payment_succeeded(payment: &PaymentRecord, attempts: u32) {
    assert_eq!(
        payment.status,
        PaymentStatus::Success,
        "Expected payment {} to be SUCCESS, got {}",
        payment.id,
        payment.status
    );
    assert_eq!(
        payment.retry_count, attempts,
        "Expected {} attempts for payment {}, got {}",
        attempts, payment.id, payment.retry_count
    );
    assert!(
        payment.failure_reason.is_none(),
        "Successful payment {} carries failure reason {:?}",
        payment.id,
        payment.failure_reason
    );
}

/// Asserts that a payment failed after exactly `attempts` attempts with a reason
pub fn assert_payment_failed(payment: &PaymentRecord, attempts: u32) {
    assert_eq!(
        payment.status,
        PaymentStatus::Failed,
        "Expected payment {} to be FAILED, got {}",
        payment.id,
        payment.status
    );
    assert_eq!(
        payment.retry_count, attempts,
        "Expected {} attempts for payment {}, got {}",
        attempts, payment.id, payment.retry_count
    );
    assert!(
        payment.failure_reason.as_deref().is_some_and(|r| !r.is_empty()),
        "Failed payment {} has no failure reason",
        payment.id
    );
}

/// Asserts that two records describe the same payment
///
/// Compares identity and the immutable request fields.
pub fn assert_same_payment(actual: &PaymentRecord, expected: &PaymentRecord) {
    assert_eq!(actual.id, expected.id, "Payment ID mismatch");
    assert_eq!(actual.idempotency_key, expected.idempotency_key, "Idempotency key mismatch");
    assert_eq!(actual.amount, expected.amount, "Amount mismatch for {}", actual.id);
    assert_eq!(actual.currency, expected.currency, "Currency mismatch for {}", actual.id);
    assert_eq!(actual.user_id, expected.user_id, "User mismatch for {}", actual.id);
}

/// Asserts that a string is a rendered payment ID (`PAY-<uuid>`)
pub fn assert_payment_id_format(id: &str) {
    let uuid = id
        .strip_prefix("PAY-")
        .unwrap_or_else(|| panic!("Payment ID '{}' lacks the PAY- prefix", id));
    assert!(
        uuid::Uuid::parse_str(uuid).is_ok(),
        "Payment ID '{}' does not contain a valid UUID",
        id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::PaymentRecordBuilder;

    #[test]
    fn test_assertions_accept_matching_records() {
        let ok = PaymentRecordBuilder::new().succeeded_after(1).build();
        assert_payment_succeeded(&ok, 1);
        assert_same_payment(&ok, &ok.clone());
        assert_payment_id_format(&ok.id.to_string());

        let failed = PaymentRecordBuilder::new().failed_after(3, "declined").build();
        assert_payment_failed(&failed, 3);
    }

    #[test]
    #[should_panic(expected = "to be SUCCESS")]
    fn test_succeeded_rejects_failed_payment() {
        let failed = PaymentRecordBuilder::new().failed_after(3, "declined").build();
        assert_payment_succeeded(&failed, 3);
    }
}
