//! Payment Domain
//!
//! This crate turns a payment-creation request into exactly one durable
//! outcome, even when the same request is submitted many times and the
//! downstream gateway fails intermittently.
//!
//! # Submission Flow
//!
//! ```text
//! validate -> lookup by idempotency key -> create (INITIATED)
//!          -> retry loop (attempt 1..=max, linear backoff) -> SUCCESS | FAILED
//! ```
//!
//! - **Validation** gates every request before any storage access.
//! - **Idempotency**: a key that already has a record is answered from that
//!   record and never re-processed. The store's uniqueness constraint settles
//!   concurrent races.
//! - **Retry**: the orchestrator owns the attempt loop and persists `SUCCESS`.
//!   The service persists `FAILED` once retries are exhausted.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_payment::{PaymentService, RetryPolicy, CreatePaymentRequest};
//!
//! let service = PaymentService::new(store, processor, RetryPolicy::default());
//! let outcome = service.submit(CreatePaymentRequest {
//!     idempotency_key: "k1".to_string(),
//!     amount: Some(10_000),
//!     currency: "INR".to_string(),
//!     user_id: "u1".to_string(),
//! }).await?;
//! ```

pub mod payment;
pub mod validation;
pub mod ports;
pub mod processor;
pub mod retry;
pub mod services;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use payment::{PaymentRecord, PaymentStatus, CreatePaymentRequest, NewPayment};
pub use validation::{PaymentValidator, ValidationError, MIN_AMOUNT, MAX_AMOUNT};
pub use ports::PaymentStore;
pub use processor::{
    PaymentProcessor, ProcessingError, FailureDecider, RandomFailure, SimulatedGateway,
};
pub use retry::{RetryOrchestrator, RetryPolicy, RetryOutcome};
pub use services::{PaymentService, SubmissionOutcome};
pub use error::PaymentError;
