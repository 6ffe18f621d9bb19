//! PostgreSQL Payment Adapter
//!
//! Implements the `PaymentStore` port using `PaymentRepository`.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - unique violation of the idempotency-key constraint -> `PortError::DuplicateKey`
//! - any other unique violation -> `PortError::Conflict`
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - `DatabaseError::Conflict` -> `PortError::Conflict`
//! - connection and pool errors -> `PortError::Connection`
//! - everything else -> `PortError::Internal`

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PaymentId, PortError,
};
use domain_payment::{PaymentRecord, PaymentStatus, PaymentStore};

use crate::error::DatabaseError;
use crate::repositories::payment::{
    PaymentRepository, PaymentRow, PaymentStatus as DbPaymentStatus, IDEMPOTENCY_KEY_CONSTRAINT,
};

const ADAPTER_ID: &str = "postgres-payment-adapter";

/// PostgreSQL-backed implementation of the PaymentStore port
///
/// Health checks run `SELECT 1` against the pool.
#[derive(Debug, Clone)]
pub struct PostgresPaymentAdapter {
    repository: PaymentRepository,
    pool: PgPool,
}

impl PostgresPaymentAdapter {
    /// Creates a new PostgreSQL payment adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &PaymentRepository {
        &self.repository
    }
}

impl DomainPort for PostgresPaymentAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPaymentAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PaymentStore for PostgresPaymentAdapter {
    #[instrument(skip(self, payment), fields(payment_id = %payment.id))]
    async fn create(&self, payment: &PaymentRecord) -> Result<(), PortError> {
        debug!("Inserting payment");

        let row = record_to_row(payment)?;
        self.repository.insert(&row).await.map_err(|e| {
            if e.is_unique_violation_of(IDEMPOTENCY_KEY_CONSTRAINT) {
                PortError::duplicate_key("Payment", &payment.idempotency_key)
            } else {
                db_to_port_error(e)
            }
        })
    }

    #[instrument(skip(self), fields(payment_id = %id))]
    async fn get_by_id(&self, id: PaymentId) -> Result<PaymentRecord, PortError> {
        debug!("Fetching payment by ID");

        let row = self
            .repository
            .get_by_id(*id.as_uuid())
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound(_) => PortError::not_found("Payment", id),
                other => db_to_port_error(other),
            })?;

        row_to_record(row)
    }

    #[instrument(skip(self))]
    async fn get_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRecord>, PortError> {
        debug!("Looking up payment by idempotency key");

        self.repository
            .find_by_idempotency_key(key)
            .await
            .map_err(db_to_port_error)?
            .map(row_to_record)
            .transpose()
    }

    #[instrument(skip(self, payment), fields(payment_id = %payment.id, status = %payment.status))]
    async fn update(&self, payment: &PaymentRecord) -> Result<(), PortError> {
        debug!("Updating payment");

        let row = record_to_row(payment)?;
        self.repository
            .update_status(&row)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound(_) => PortError::not_found("Payment", payment.id),
                other => db_to_port_error(other),
            })
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(msg) => PortError::NotFound {
            entity_type: "Payment".to_string(),
            id: msg,
        },
        DatabaseError::Conflict(msg) => PortError::conflict(msg),
        DatabaseError::DuplicateEntry { message, .. } => PortError::conflict(message),
        DatabaseError::ConstraintViolation(msg) => PortError::validation(msg),
        DatabaseError::ConnectionFailed(msg) => PortError::connection(msg),
        DatabaseError::PoolExhausted => PortError::unavailable("database connection pool"),
        other => PortError::internal(other.to_string()),
    }
}

fn domain_to_db_status(status: PaymentStatus) -> DbPaymentStatus {
    match status {
        PaymentStatus::Initiated => DbPaymentStatus::Initiated,
        PaymentStatus::Success => DbPaymentStatus::Success,
        PaymentStatus::Failed => DbPaymentStatus::Failed,
    }
}

fn db_to_domain_status(status: DbPaymentStatus) -> PaymentStatus {
    match status {
        DbPaymentStatus::Initiated => PaymentStatus::Initiated,
        DbPaymentStatus::Success => PaymentStatus::Success,
        DbPaymentStatus::Failed => PaymentStatus::Failed,
    }
}

fn record_to_row(payment: &PaymentRecord) -> Result<PaymentRow, PortError> {
    let retry_count = i32::try_from(payment.retry_count)
        .map_err(|_| PortError::validation(format!("retry count {} out of range", payment.retry_count)))?;

    Ok(PaymentRow {
        id: *payment.id.as_uuid(),
        user_id: payment.user_id.clone(),
        amount: payment.amount,
        currency: payment.currency.clone(),
        status: domain_to_db_status(payment.status),
        idempotency_key: payment.idempotency_key.clone(),
        retry_count,
        failure_reason: payment.failure_reason.clone(),
        created_at: payment.created_at,
        updated_at: payment.updated_at,
    })
}

fn row_to_record(row: PaymentRow) -> Result<PaymentRecord, PortError> {
    let retry_count = u32::try_from(row.retry_count)
        .map_err(|_| PortError::internal(format!("negative retry count for payment {}", row.id)))?;

    Ok(PaymentRecord {
        id: PaymentId::from_uuid(row.id),
        user_id: row.user_id,
        amount: row.amount,
        currency: row.currency,
        status: db_to_domain_status(row.status),
        idempotency_key: row.idempotency_key,
        retry_count,
        failure_reason: row.failure_reason,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
