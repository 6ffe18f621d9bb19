//! Domain Adapters
//!
//! Implementations of domain ports on top of the repository layer.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresPaymentAdapter;
//! use domain_payment::PaymentStore;
//!
//! let store: Arc<dyn PaymentStore> = Arc::new(PostgresPaymentAdapter::new(pool));
//! ```

pub mod payment;

pub use payment::PostgresPaymentAdapter;
