//! Core Kernel - Foundational types shared by the payments service
//!
//! This crate provides the building blocks used across the domain, storage
//! and transport crates:
//! - Strongly-typed identifiers
//! - Port infrastructure (the error type every adapter speaks, health checks)
//! - Common error type for kernel-level failures

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::PaymentId;
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
