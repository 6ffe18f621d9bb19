//! Payment repository implementation
//!
//! All statements are single-row and run outside explicit transactions.
//! The unique constraint on `idempotency_key` makes `insert` atomic with
//! respect to the idempotency check.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Name of the unique constraint guarding idempotency keys
pub const IDEMPOTENCY_KEY_CONSTRAINT: &str = "payments_idempotency_key_unique";

const SELECT_PAYMENT: &str = r#"
    SELECT id, user_id, amount, currency, status, idempotency_key,
           retry_count, failure_reason, created_at, updated_at
    FROM payments
"#;

/// Repository for the `payments` table
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new payment row
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` naming [`IDEMPOTENCY_KEY_CONSTRAINT`]
    /// if the key is already taken
    pub async fn insert(&self, row: &PaymentRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, amount, currency, status, idempotency_key,
                retry_count, failure_reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(row.id)
        .bind(&row.user_id)
        .bind(row.amount)
        .bind(&row.currency)
        .bind(row.status)
        .bind(&row.idempotency_key)
        .bind(row.retry_count)
        .bind(&row.failure_reason)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieves a payment by its identifier
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if no row has this id
    pub async fn get_by_id(&self, id: Uuid) -> Result<PaymentRow, DatabaseError> {
        sqlx::query_as::<_, PaymentRow>(&format!("{SELECT_PAYMENT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Payment", id))
    }

    /// Retrieves the payment holding an idempotency key, if any
    pub async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!("{SELECT_PAYMENT} WHERE idempotency_key = $1"))
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Writes the mutable fields of a payment that is still `INITIATED`
    ///
    /// Identity, amount, currency, user and key are never rewritten.
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if the row does not exist,
    /// `DatabaseError::Conflict` if it is already terminal
    pub async fn update_status(&self, row: &PaymentRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, retry_count = $3, failure_reason = $4, updated_at = $5
            WHERE id = $1 AND status = 'INITIATED'
            "#,
        )
        .bind(row.id)
        .bind(row.status)
        .bind(row.retry_count)
        .bind(&row.failure_reason)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let current = self.get_by_id(row.id).await?;
        Err(DatabaseError::Conflict(format!(
            "payment {} is already {:?}",
            row.id, current.status
        )))
    }

    /// Counts all payment rows
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Payment status as stored in the `payment_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Initiated,
    Success,
    Failed,
}

/// Database row for a payment
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub idempotency_key: String,
    pub retry_count: i32,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
