//! In-memory test doubles
//!
//! Useful for unit and HTTP tests without a database or a gateway.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PaymentId, PortError,
};

use crate::payment::PaymentRecord;
use crate::ports::PaymentStore;
use crate::processor::{PaymentProcessor, ProcessingError};

#[derive(Debug, Default)]
struct Tables {
    payments: HashMap<PaymentId, PaymentRecord>,
    by_key: HashMap<String, PaymentId>,
}

/// In-memory implementation of PaymentStore
///
/// The idempotency-key check and the insert happen under one write lock,
/// matching the atomicity of a database unique constraint.
#[derive(Debug, Default)]
pub struct InMemoryPaymentStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    updates: AtomicU32,
}

impl InMemoryPaymentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with payments for testing
    pub async fn with_payments(payments: Vec<PaymentRecord>) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write().await;
            for payment in payments {
                tables.by_key.insert(payment.idempotency_key.clone(), payment.id);
                tables.payments.insert(payment.id, payment);
            }
        }
        store
    }

    /// Makes every subsequent call fail with a connection error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored payments
    pub async fn len(&self) -> usize {
        self.tables.read().await.payments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of successful `update` calls
    pub fn update_count(&self) -> u32 {
        self.updates.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), PortError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(PortError::connection("in-memory store marked unavailable"))
        } else {
            Ok(())
        }
    }
}

impl DomainPort for InMemoryPaymentStore {}

#[async_trait]
impl HealthCheckable for InMemoryPaymentStore {
    async fn health_check(&self) -> HealthCheckResult {
        let unavailable = self.unavailable.load(Ordering::SeqCst);
        HealthCheckResult {
            adapter_id: "in-memory-payment-store".to_string(),
            status: if unavailable { AdapterHealth::Unhealthy } else { AdapterHealth::Healthy },
            latency_ms: 0,
            message: unavailable.then(|| "store marked unavailable".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, payment: &PaymentRecord) -> Result<(), PortError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.by_key.contains_key(&payment.idempotency_key) {
            return Err(PortError::duplicate_key("Payment", &payment.idempotency_key));
        }
        if tables.payments.contains_key(&payment.id) {
            return Err(PortError::conflict(format!("payment {} already exists", payment.id)));
        }

        tables.by_key.insert(payment.idempotency_key.clone(), payment.id);
        tables.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: PaymentId) -> Result<PaymentRecord, PortError> {
        self.check_available()?;
        self.tables
            .read()
            .await
            .payments
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Payment", id))
    }

    async fn get_by_idempotency_key(&self, key: &str) -> Result<Option<PaymentRecord>, PortError> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .by_key
            .get(key)
            .and_then(|id| tables.payments.get(id))
            .cloned())
    }

    async fn update(&self, payment: &PaymentRecord) -> Result<(), PortError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let stored = tables
            .payments
            .get_mut(&payment.id)
            .ok_or_else(|| PortError::not_found("Payment", payment.id))?;

        if stored.status.is_terminal() {
            return Err(PortError::conflict(format!(
                "payment {} is already {}",
                stored.id, stored.status
            )));
        }

        stored.status = payment.status;
        stored.retry_count = payment.retry_count;
        stored.failure_reason = payment.failure_reason.clone();
        stored.updated_at = payment.updated_at;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Processor that replays a fixed script of outcomes
///
/// Once the script runs out every attempt returns the fallback outcome.
#[derive(Debug)]
pub struct ScriptedProcessor {
    script: Mutex<VecDeque<Result<(), ProcessingError>>>,
    fallback: Result<(), ProcessingError>,
    latency: Duration,
    attempts: AtomicU32,
}

impl ScriptedProcessor {
    /// Creates a processor from explicit outcomes
    pub fn from_outcomes(
        outcomes: Vec<Result<(), ProcessingError>>,
        fallback: Result<(), ProcessingError>,
    ) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            fallback,
            latency: Duration::ZERO,
            attempts: AtomicU32::new(0),
        }
    }

    /// Every attempt succeeds
    pub fn always_succeed() -> Self {
        Self::from_outcomes(Vec::new(), Ok(()))
    }

    /// Every attempt fails with `error`
    pub fn always_fail(error: ProcessingError) -> Self {
        Self::from_outcomes(Vec::new(), Err(error))
    }

    /// Attempts `1..attempt` fail with a gateway timeout, then every attempt succeeds
    pub fn succeed_on_attempt(attempt: u32) -> Self {
        let failures = attempt.saturating_sub(1) as usize;
        Self::from_outcomes(vec![Err(ProcessingError::GatewayTimeout); failures], Ok(()))
    }

    /// Delays every attempt by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Total attempts made across all payments
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DomainPort for ScriptedProcessor {}

#[async_trait]
impl PaymentProcessor for ScriptedProcessor {
    async fn attempt(&self, _payment: &PaymentRecord) -> Result<(), ProcessingError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
