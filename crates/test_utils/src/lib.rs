//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! payments test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built requests and in-memory service wiring
//! - `builders`: Builder patterns for requests and records
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Custom assertion helpers for payments
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
