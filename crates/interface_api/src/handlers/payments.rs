//! Payment handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, Instrument};

use domain_payment::PaymentStatus;

use crate::dto::payments::{CreatePaymentBody, PaymentResponse};
use crate::{error::ApiError, AppState};

/// Submits a payment
///
/// Returns 201 for a newly processed `SUCCESS`, 200 for a newly processed
/// `FAILED` and 200 for any idempotent replay.
///
/// The submission runs on its own task so a dropped connection cannot
/// cancel it between record creation and the terminal update.
pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let service = state.service.clone();
    let outcome = tokio::spawn(
        async move { service.submit(body.into()).await }.instrument(tracing::Span::current()),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Payment submission task failed");
        ApiError::Internal("payment submission did not complete".to_string())
    })??;

    let status = if !outcome.replayed && outcome.payment.status == PaymentStatus::Success {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(PaymentResponse::from(&outcome.payment))))
}

/// Gets a payment by ID, with or without the `PAY-` prefix
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state.service.fetch(&payment_id).await?;
    Ok(Json(PaymentResponse::from(&payment)))
}
