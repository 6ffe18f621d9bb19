//! HTTP API Layer
//!
//! REST API for the payments service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: payment submission, payment lookup, health
//! - **Middleware**: request-id propagation, tracing, request logging
//! - **DTOs**: request/response bodies, snake_case JSON
//! - **Error Handling**: consistent `{error, message, details}` bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_payment::PaymentService;

use crate::config::ApiConfig;
use crate::handlers::{health, payments};
use crate::middleware::request_logging;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PaymentService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(service: PaymentService, config: ApiConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
///
/// Health routes sit at the root. Payment routes are nested under `/api/v1`.
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let payment_routes = Router::new()
        .route("/", post(payments::create_payment))
        .route("/:payment_id", get(payments::get_payment));

    let api_routes = Router::new()
        .nest("/payments", payment_routes)
        .layer(axum_middleware::from_fn(request_logging));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
