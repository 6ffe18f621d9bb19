//! Payment Domain Ports
//!
//! The `PaymentStore` trait is the record store the service depends on.
//! Two adapters implement it:
//!
//! - **PostgreSQL**: `infra_db::adapters::PostgresPaymentAdapter`
//! - **In-memory**: `mock::InMemoryPaymentStore`, for tests
//!
//! # Duplicate suppression
//!
//! The store is the final arbiter of idempotency. `create` must fail with
//! `PortError::DuplicateKey` when the idempotency key already exists, and
//! that check must be atomic with the insert. An application-level lookup
//! alone cannot close the race between two concurrent submissions.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PaymentId, PortError};

use crate::payment::PaymentRecord;

/// Durable keyed storage for payment records
#[async_trait]
pub trait PaymentStore: DomainPort + HealthCheckable {
    /// Inserts a new payment
    ///
    /// # Errors
    ///
    /// `PortError::DuplicateKey` if the idempotency key is already taken
    async fn create(&self, payment: &PaymentRecord) -> Result<(), PortError>;

    /// Retrieves a payment by ID, or `PortError::NotFound`
    async fn get_by_id(&self, id: PaymentId) -> Result<PaymentRecord, PortError>;

    /// Retrieves a payment by idempotency key
    ///
    /// Absence is `Ok(None)`, never an error, so callers can tell
    /// "lookup failed" apart from "legitimately absent".
    async fn get_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRecord>, PortError>;

    /// Overwrites the mutable fields of a payment by ID
    ///
    /// Only `status`, `retry_count`, `failure_reason` and `updated_at` are
    /// written. A payment already in a terminal status is not overwritten:
    /// the call fails with `PortError::Conflict`.
    async fn update(&self, payment: &PaymentRecord) -> Result<(), PortError>;
}
