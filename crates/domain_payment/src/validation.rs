//! Payment request validation
//!
//! Rules are checked in a fixed order and the first violation is reported:
//!
//! 1. `amount` present and at least [`MIN_AMOUNT`]
//! 2. `amount` at most [`MAX_AMOUNT`]
//! 3. `currency` exactly 3 characters
//! 4. `idempotency_key` non-empty
//! 5. `user_id` non-empty
//!
//! Validation is a pure function of the request.

use thiserror::Error;

use crate::payment::{CreatePaymentRequest, NewPayment};

/// Smallest accepted amount, in minor units
pub const MIN_AMOUNT: i64 = 1;

/// Largest accepted amount, in minor units
pub const MAX_AMOUNT: i64 = 1_000_000;

/// Currency codes are ISO 4217 alpha-3
pub const CURRENCY_CODE_LEN: usize = 3;

/// A violated validation rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,

    #[error("amount must be at least {min}")]
    AmountTooSmall { min: i64 },

    #[error("amount cannot exceed {max}")]
    AmountTooLarge { max: i64 },

    #[error("currency must be a 3-letter ISO code")]
    InvalidCurrency,

    #[error("idempotency key is required")]
    MissingIdempotencyKey,

    #[error("user ID is required")]
    MissingUserId,
}

impl ValidationError {
    /// Name of the offending request field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingAmount
            | ValidationError::AmountTooSmall { .. }
            | ValidationError::AmountTooLarge { .. } => "amount",
            ValidationError::InvalidCurrency => "currency",
            ValidationError::MissingIdempotencyKey => "idempotency_key",
            ValidationError::MissingUserId => "user_id",
        }
    }
}

/// Validator for payment-creation requests
pub struct PaymentValidator;

impl PaymentValidator {
    /// Validates a request, returning the accepted payment data
    ///
    /// # Errors
    ///
    /// The first violated rule, in rule order
    pub fn validate(request: &CreatePaymentRequest) -> Result<NewPayment, ValidationError> {
        let amount = request.amount.ok_or(ValidationError::MissingAmount)?;

        if amount < MIN_AMOUNT {
            return Err(ValidationError::AmountTooSmall { min: MIN_AMOUNT });
        }

        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge { max: MAX_AMOUNT });
        }

        if request.currency.chars().count() != CURRENCY_CODE_LEN {
            return Err(ValidationError::InvalidCurrency);
        }

        if request.idempotency_key.trim().is_empty() {
            return Err(ValidationError::MissingIdempotencyKey);
        }

        if request.user_id.trim().is_empty() {
            return Err(ValidationError::MissingUserId);
        }

        Ok(NewPayment {
            idempotency_key: request.idempotency_key.clone(),
            amount,
            currency: request.currency.clone(),
            user_id: request.user_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            idempotency_key: "k1".to_string(),
            amount: Some(10_000),
            currency: "INR".to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let accepted = PaymentValidator::validate(&valid_request()).unwrap();
        assert_eq!(accepted.amount, 10_000);
        assert_eq!(accepted.currency, "INR");
    }

    #[test]
    fn test_boundaries_accepted() {
        for amount in [MIN_AMOUNT, MAX_AMOUNT] {
            let request = CreatePaymentRequest { amount: Some(amount), ..valid_request() };
            assert!(PaymentValidator::validate(&request).is_ok(), "amount {} rejected", amount);
        }
    }

    #[test]
    fn test_amount_rules() {
        let cases = [
            (None, ValidationError::MissingAmount),
            (Some(0), ValidationError::AmountTooSmall { min: MIN_AMOUNT }),
            (Some(-5), ValidationError::AmountTooSmall { min: MIN_AMOUNT }),
            (Some(MAX_AMOUNT + 1), ValidationError::AmountTooLarge { max: MAX_AMOUNT }),
        ];
        for (amount, expected) in cases {
            let request = CreatePaymentRequest { amount, ..valid_request() };
            assert_eq!(PaymentValidator::validate(&request).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_currency_counts_characters() {
        for currency in ["IN", "INRS", "", "€€€€"] {
            let request = CreatePaymentRequest { currency: currency.to_string(), ..valid_request() };
            assert_eq!(
                PaymentValidator::validate(&request).unwrap_err(),
                ValidationError::InvalidCurrency
            );
        }
        let request = CreatePaymentRequest { currency: "€€€".to_string(), ..valid_request() };
        assert!(PaymentValidator::validate(&request).is_ok());
    }

    #[test]
    fn test_missing_identifiers() {
        let request = CreatePaymentRequest { idempotency_key: "  ".to_string(), ..valid_request() };
        assert_eq!(
            PaymentValidator::validate(&request).unwrap_err(),
            ValidationError::MissingIdempotencyKey
        );

        let request = CreatePaymentRequest { user_id: String::new(), ..valid_request() };
        assert_eq!(
            PaymentValidator::validate(&request).unwrap_err(),
            ValidationError::MissingUserId
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let request = CreatePaymentRequest {
            idempotency_key: String::new(),
            amount: Some(-500),
            currency: "X".to_string(),
            user_id: String::new(),
        };
        let err = PaymentValidator::validate(&request).unwrap_err();
        assert_eq!(err, ValidationError::AmountTooSmall { min: MIN_AMOUNT });
        assert_eq!(err.field(), "amount");
    }
}
