//! HTTP tests for the payments API, driven in-process over in-memory doubles

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use domain_payment::mock::ScriptedProcessor;
use domain_payment::ProcessingError;
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{assert_payment_id_format, invalid_request_strategy, InMemoryHarness};

fn app(harness: &InMemoryHarness) -> Router {
    create_router(AppState::new(harness.service.clone(), ApiConfig::default()))
}

fn post_payment(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/payments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn canonical_body() -> Value {
    json!({
        "idempotency_key": "k1",
        "amount": 10000,
        "currency": "INR",
        "user_id": "u1"
    })
}

// ============================================================================
// Health Tests
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let harness = InMemoryHarness::succeeding();
        let (status, body) = send(&app(&harness), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_follows_store_health() {
        let harness = InMemoryHarness::succeeding();
        let app = app(&harness);

        let (status, body) = send(&app, get("/health/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");

        harness.store.set_unavailable(true);
        let (status, body) = send(&app, get("/health/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let harness = InMemoryHarness::succeeding();
        let response = app(&harness).oneshot(get("/health")).await.unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }
}

// ============================================================================
// Submission Tests
// ============================================================================

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_successful_payment_is_created() {
        let harness = InMemoryHarness::succeeding();
        let (status, body) = send(&app(&harness), post_payment(canonical_body())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "SUCCESS");
        assert_eq!(body["amount"], 10000);
        assert_eq!(body["currency"], "INR");
        assert_eq!(body["retry_count"], 1);
        assert!(body.get("failure_reason").is_none());
        assert!(body["created_at"].is_string());
        assert_payment_id_format(body["payment_id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_replay_returns_ok_with_same_id() {
        let harness = InMemoryHarness::succeeding();
        let app = app(&harness);

        let (_, first) = send(&app, post_payment(canonical_body())).await;
        let (status, second) = send(&app, post_payment(canonical_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["payment_id"], first["payment_id"]);
        assert_eq!(harness.processor.attempts(), 1);
        assert_eq!(harness.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_payment_is_not_an_error() {
        let harness = InMemoryHarness::new(
            ScriptedProcessor::always_fail(ProcessingError::GatewayTimeout),
            InMemoryHarness::instant_policy(3),
        );
        let (status, body) = send(&app(&harness), post_payment(canonical_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "FAILED");
        assert_eq!(body["retry_count"], 3);
        assert!(body["failure_reason"]
            .as_str()
            .unwrap()
            .contains("payment gateway timeout"));
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let harness = InMemoryHarness::succeeding();
        let mut body = canonical_body();
        body["amount"] = json!(-500);

        let (status, error) = send(&app(&harness), post_payment(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "validation_error");
        assert_eq!(error["message"], "amount must be at least 1");
        assert_eq!(error["details"], json!(["amount"]));
        assert!(harness.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_fields_reach_validation() {
        let harness = InMemoryHarness::succeeding();
        let (status, error) = send(&app(&harness), post_payment(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "validation_error");
        assert_eq!(error["message"], "amount is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let harness = InMemoryHarness::succeeding();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"amount\": "))
            .unwrap();

        let (status, error) = send(&app(&harness), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "bad_request");
        assert!(harness.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_outage_is_service_unavailable() {
        let harness = InMemoryHarness::succeeding();
        harness.store.set_unavailable(true);

        let (status, error) = send(&app(&harness), post_payment(canonical_body())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error["error"], "service_unavailable");
        assert_eq!(harness.processor.attempts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_posts_share_one_payment() {
        let harness = InMemoryHarness::new(
            ScriptedProcessor::always_succeed().with_latency(std::time::Duration::from_millis(20)),
            InMemoryHarness::instant_policy(3),
        );
        let app = app(&harness);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send(&app, post_payment(canonical_body())).await })
            })
            .collect();

        let mut ids = Vec::new();
        let mut created = 0;
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            assert!(status == StatusCode::CREATED || status == StatusCode::OK);
            if status == StatusCode::CREATED {
                created += 1;
            }
            ids.push(body["payment_id"].clone());
        }

        assert_eq!(created, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(harness.store.len().await, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_invalid_requests_never_create_records(request in invalid_request_strategy()) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let harness = InMemoryHarness::succeeding();
            let app = app(&harness);

            let body = json!({
                "idempotency_key": request.idempotency_key,
                "amount": request.amount,
                "currency": request.currency,
                "user_id": request.user_id,
            });
            let (status, error) = runtime.block_on(send(&app, post_payment(body)));

            prop_assert_eq!(status, StatusCode::BAD_REQUEST);
            prop_assert_eq!(error["error"].as_str(), Some("validation_error"));
            prop_assert!(runtime.block_on(harness.store.is_empty()));
        }
    }
}

// ============================================================================
// Lookup Tests
// ============================================================================

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_created_payment() {
        let harness = InMemoryHarness::succeeding();
        let app = app(&harness);
        let (_, created) = send(&app, post_payment(canonical_body())).await;
        let id = created["payment_id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get(&format!("/api/v1/payments/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment_id"], created["payment_id"]);
        assert_eq!(body["status"], "SUCCESS");

        let bare = id.trim_start_matches("PAY-");
        let (status, body) = send(&app, get(&format!("/api/v1/payments/{}", bare))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment_id"], created["payment_id"]);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let harness = InMemoryHarness::succeeding();
        let (status, error) = send(&app(&harness), get("/api/v1/payments/not-a-uuid")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "invalid_payment_id");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let harness = InMemoryHarness::succeeding();
        let uri = format!("/api/v1/payments/PAY-{}", uuid_v4());
        let (status, error) = send(&app(&harness), get(&uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["error"], "not_found");
    }

    fn uuid_v4() -> String {
        core_kernel::PaymentId::new().as_uuid().to_string()
    }
}
