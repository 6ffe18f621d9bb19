//! Repository implementations
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! plain row types. They know nothing about ports.

pub mod payment;

pub use payment::{PaymentRepository, PaymentRow, PaymentStatus, IDEMPOTENCY_KEY_CONSTRAINT};
