//! Payment domain errors

use thiserror::Error;

use core_kernel::{PaymentId, PortError};

use crate::payment::PaymentStatus;
use crate::validation::ValidationError;

/// Errors that can occur in the payment domain
///
/// A payment that ends in `FAILED` is not an error. It is a normal
/// outcome returned through `SubmissionOutcome`.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The request violated a validation rule
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The payment identifier could not be parsed
    #[error("Invalid payment ID format: {0}")]
    InvalidPaymentId(String),

    /// No payment exists for the identifier
    #[error("Payment not found: {0}")]
    NotFound(PaymentId),

    /// A status change would break status monotonicity
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// The payment store failed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl PaymentError {
    /// Returns true if the caller may safely retry the whole submission
    pub fn is_transient(&self) -> bool {
        match self {
            PaymentError::Store(err) => err.is_transient(),
            _ => false,
        }
    }
}
