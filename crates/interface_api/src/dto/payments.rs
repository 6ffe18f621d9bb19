//! Payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain_payment::{CreatePaymentRequest, PaymentRecord, PaymentStatus};

/// Body of `POST /api/v1/payments`
///
/// Every field is optional at the JSON layer so that missing values reach
/// domain validation and produce its message.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CreatePaymentBody {
    pub idempotency_key: String,
    pub amount: Option<i64>,
    pub currency: String,
    pub user_id: String,
}

impl From<CreatePaymentBody> for CreatePaymentRequest {
    fn from(body: CreatePaymentBody) -> Self {
        CreatePaymentRequest {
            idempotency_key: body.idempotency_key,
            amount: body.amount,
            currency: body.currency,
            user_id: body.user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// `PAY-<uuid>`
    pub payment_id: String,
    pub status: PaymentStatus,
    pub amount: i64,
    pub currency: String,
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&PaymentRecord> for PaymentResponse {
    fn from(payment: &PaymentRecord) -> Self {
        Self {
            payment_id: payment.id.to_string(),
            status: payment.status,
            amount: payment.amount,
            currency: payment.currency.clone(),
            retry_count: payment.retry_count,
            failure_reason: payment.failure_reason.clone(),
            created_at: payment.created_at,
        }
    }
}
