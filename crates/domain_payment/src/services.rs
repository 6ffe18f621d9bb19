//! Payment domain services
//!
//! `PaymentService` is the submission coordinator: it validates, enforces
//! idempotency, creates the record, runs the retry loop and persists the
//! terminal failure.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use core_kernel::{PaymentId, PortError};

use crate::error::PaymentError;
use crate::payment::{CreatePaymentRequest, PaymentRecord};
use crate::ports::PaymentStore;
use crate::processor::PaymentProcessor;
use crate::retry::{RetryOrchestrator, RetryOutcome, RetryPolicy};
use crate::validation::PaymentValidator;

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Current state of the payment for the idempotency key
    pub payment: PaymentRecord,
    /// True when the key was already known and nothing was processed
    pub replayed: bool,
}

impl SubmissionOutcome {
    fn processed(payment: PaymentRecord) -> Self {
        Self { payment, replayed: false }
    }

    fn replayed(payment: PaymentRecord) -> Self {
        Self { payment, replayed: true }
    }
}

/// Coordinates idempotent payment submission
///
/// The only shared state is the store. Each call is independent, so one
/// service instance serves any number of concurrent submissions.
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    orchestrator: RetryOrchestrator,
}

impl PaymentService {
    /// Creates a new payment service
    ///
    /// # Arguments
    ///
    /// * `store` - Record store shared with every other submission
    /// * `processor` - Downstream gateway
    /// * `policy` - Attempt budget and backoff
    pub fn new(
        store: Arc<dyn PaymentStore>,
        processor: Arc<dyn PaymentProcessor>,
        policy: RetryPolicy,
    ) -> Self {
        let orchestrator = RetryOrchestrator::new(store.clone(), processor, policy);
        Self { store, orchestrator }
    }

    /// Returns the underlying record store
    pub fn store(&self) -> &Arc<dyn PaymentStore> {
        &self.store
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.orchestrator.policy()
    }

    /// Submits a payment request
    ///
    /// This method:
    /// 1. Validates the request, touching no storage on failure
    /// 2. Returns the existing payment if the idempotency key is known
    /// 3. Creates an `INITIATED` payment, recovering from a concurrent
    ///    duplicate-key insert by returning the winner's payment
    /// 4. Runs the retry loop
    /// 5. Persists `FAILED` if every attempt failed
    ///
    /// A `FAILED` payment is a successful outcome, not an error.
    ///
    /// # Errors
    ///
    /// `PaymentError::Validation` for an invalid request, `PaymentError::Store`
    /// if the store fails before the payment is created
    #[instrument(
        skip(self, request),
        fields(idempotency_key = %request.idempotency_key, user_id = %request.user_id)
    )]
    pub async fn submit(&self, request: CreatePaymentRequest) -> Result<SubmissionOutcome, PaymentError> {
        info!("Processing payment request");

        let new_payment = PaymentValidator::validate(&request).map_err(|e| {
            warn!(error = %e, field = e.field(), "Validation failed");
            e
        })?;

        if let Some(existing) = self
            .store
            .get_by_idempotency_key(&new_payment.idempotency_key)
            .await
            .map_err(|e| {
                error!(error = %e, "Error checking idempotency");
                e
            })?
        {
            info!(payment_id = %existing.id, status = %existing.status, "Idempotent request detected, returning existing payment");
            return Ok(SubmissionOutcome::replayed(existing));
        }

        let mut payment = PaymentRecord::initiate(new_payment);

        match self.store.create(&payment).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate_key() => {
                warn!("Concurrent submission created this key first, returning its payment");
                return self.replay_existing(&payment.idempotency_key).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to create payment");
                return Err(e.into());
            }
        }

        match self.orchestrator.run(&mut payment).await? {
            RetryOutcome::Succeeded { attempts } => {
                info!(payment_id = %payment.id, attempts, "Payment processed successfully");
            }
            RetryOutcome::Exhausted { attempts, reason } => {
                warn!(payment_id = %payment.id, attempts, reason = %reason, "Payment processing failed after retries");
                payment.mark_failed(reason)?;
                if let Err(e) = self.store.update(&payment).await {
                    error!(payment_id = %payment.id, error = %e, "Failed to persist failed payment");
                }
            }
        }

        Ok(SubmissionOutcome::processed(payment))
    }

    /// Fetches a payment by its identifier string
    ///
    /// Accepts `PAY-<uuid>` or a bare UUID.
    ///
    /// # Errors
    ///
    /// `PaymentError::InvalidPaymentId` for malformed input, distinct from
    /// `PaymentError::NotFound`
    #[instrument(skip(self))]
    pub async fn fetch(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError> {
        info!("Fetching payment");

        let id: PaymentId = payment_id
            .parse()
            .map_err(|_| PaymentError::InvalidPaymentId(payment_id.to_string()))?;

        self.store.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                PaymentError::NotFound(id)
            } else {
                error!(error = %e, "Failed to fetch payment");
                PaymentError::Store(e)
            }
        })
    }

    async fn replay_existing(&self, key: &str) -> Result<SubmissionOutcome, PaymentError> {
        match self.store.get_by_idempotency_key(key).await? {
            Some(winner) => {
                info!(payment_id = %winner.id, status = %winner.status, "Returning payment created by concurrent submission");
                Ok(SubmissionOutcome::replayed(winner))
            }
            None => Err(PortError::internal(
                "store reported a duplicate idempotency key but holds no payment for it",
            )
            .into()),
        }
    }
}
