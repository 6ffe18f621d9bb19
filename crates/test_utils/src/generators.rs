//! Property-Based Test Generators
//!
//! Proptest strategies for payment requests on both sides of the
//! validation boundary.

use proptest::prelude::*;

use domain_payment::{CreatePaymentRequest, MAX_AMOUNT, MIN_AMOUNT};

/// Strategy for amounts inside the accepted range
pub fn valid_amount_strategy() -> impl Strategy<Value = i64> {
    MIN_AMOUNT..=MAX_AMOUNT
}

/// Strategy for amounts outside the accepted range, including the edges
pub fn invalid_amount_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        Just(MIN_AMOUNT - 1),
        Just(MAX_AMOUNT + 1),
        (i64::MIN..MIN_AMOUNT),
        ((MAX_AMOUNT + 1)..i64::MAX),
    ]
}

/// Strategy for three-letter currency codes
pub fn currency_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("GBP".to_string()),
        Just("INR".to_string()),
        Just("JPY".to_string()),
        "[A-Z]{3}",
    ]
}

/// Strategy for currency codes of the wrong length
pub fn invalid_currency_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{0,2}|[A-Z]{4,6}"
}

/// Strategy for non-blank idempotency keys
pub fn idempotency_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9-]{1,36}"
}

/// Strategy for requests that pass validation
pub fn valid_request_strategy() -> impl Strategy<Value = CreatePaymentRequest> {
    (
        idempotency_key_strategy(),
        valid_amount_strategy(),
        currency_code_strategy(),
        "[a-z][a-z0-9]{0,15}",
    )
        .prop_map(|(idempotency_key, amount, currency, user_id)| CreatePaymentRequest {
            idempotency_key,
            amount: Some(amount),
            currency,
            user_id,
        })
}

/// Strategy for requests that violate at least one validation rule
pub fn invalid_request_strategy() -> impl Strategy<Value = CreatePaymentRequest> {
    let bad_amount = (valid_request_strategy(), invalid_amount_strategy())
        .prop_map(|(request, amount)| CreatePaymentRequest { amount: Some(amount), ..request });
    let no_amount = valid_request_strategy()
        .prop_map(|request| CreatePaymentRequest { amount: None, ..request });
    let bad_currency = (valid_request_strategy(), invalid_currency_strategy())
        .prop_map(|(request, currency)| CreatePaymentRequest { currency, ..request });
    let blank_key = valid_request_strategy()
        .prop_map(|request| CreatePaymentRequest { idempotency_key: "  ".to_string(), ..request });
    let blank_user = valid_request_strategy()
        .prop_map(|request| CreatePaymentRequest { user_id: String::new(), ..request });

    prop_oneof![bad_amount, no_amount, bad_currency, blank_key, blank_user]
}
