//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the payments service using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. `PaymentRepository` owns the
//! SQL and maps rows. `PostgresPaymentAdapter` implements the domain's
//! `PaymentStore` port on top of it and translates errors into `PortError`.
//!
//! The idempotency guarantee rests on the `payments_idempotency_key_unique`
//! constraint: concurrent inserts of one key produce exactly one row, and
//! the loser sees `PortError::DuplicateKey`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresPaymentAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/payments")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresPaymentAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use repositories::PaymentRepository;
pub use adapters::PostgresPaymentAdapter;
