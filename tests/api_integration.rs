//! Integration tests for the HTTP API
//!
//! Tests endpoints through the router without binding a socket

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use wellguard::core::{create_router, AppState, CrisisMonitor, MemoryStore};

fn create_test_router() -> Router {
    create_router(AppState::new(CrisisMonitor::new(Arc::new(MemoryStore::new()))))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn send_raw(app: &Router, request: Request<Body>) -> StatusCode {
    let response = app.clone().oneshot(request).await.unwrap();
    response.status()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["pending_alerts"], 0);
}

#[tokio::test]
async fn test_score_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, post_json("/score", r#"{"text": "I want to kill myself"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["level"], 10);
    assert_eq!(json["category"], "critical");
    assert_eq!(json["band"], "CRISIS");
    assert_eq!(json["severity"], 5);
    assert_eq!(json["alert_recommended"], true);
    assert_eq!(json["matched_keywords"][0], "kill myself");
}

#[tokio::test]
async fn test_score_does_not_store_alerts() {
    let app = create_test_router();
    send(&app, post_json("/score", r#"{"text": "I want to kill myself"}"#)).await;

    let (_, alerts) = send(&app, get("/alerts")).await;
    assert_eq!(alerts.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_preview_endpoint() {
    let app = create_test_router();

    let (status, json) = send(&app, post_json("/preview", r#"{"text": "so sad"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ready"], false);
    assert_eq!(json["reason"], "R401_PREVIEW_TOO_SHORT");
    assert!(json.get("result").is_none());

    let (_, json) = send(&app, post_json("/preview", r#"{"text": "I feel so overwhelmed"}"#)).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["result"]["level"], 5);
    assert_eq!(json["result"]["alert_recommended"], true);
}

#[tokio::test]
async fn test_entry_raises_alert_and_counselor_workflow() {
    let app = create_test_router();

    let (status, outcome) = send(
        &app,
        post_json("/entries", r#"{"subject_id": "student-42", "text": "I feel worthless"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["alert"]["state"], "delivered");
    assert_eq!(outcome["reason"], "R301_ALERT_DELIVERED");
    let alert_id = outcome["alert"]["alert_id"].as_str().unwrap().to_string();

    let (status, alert) = send(&app, get(&format!("/alerts/{}", alert_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alert["subject_id"], "student-42");
    assert_eq!(alert["alert_type"], "self_harm");
    assert_eq!(alert["severity_level"], 4);
    assert_eq!(alert["status"], "pending");

    let (_, pending) = send(&app, get("/alerts?status=pending")).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        post_json(&format!("/alerts/{}/status", alert_id), r#"{"status": "resolved"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "resolved");

    let (status, _) = send(
        &app,
        post_json(&format!("/alerts/{}/status", alert_id), r#"{"status": "pending"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, pending) = send(&app, get("/alerts?status=pending")).await;
    assert_eq!(pending.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_low_risk_entry_has_no_alert() {
    let app = create_test_router();
    let (status, outcome) = send(
        &app,
        post_json("/entries", r#"{"subject_id": "student-1", "text": "Had a good day, feeling calm"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["alert"]["state"], "not_raised");
    assert_eq!(outcome["result"]["category"], "positive");
}

#[tokio::test]
async fn test_entry_requires_subject() {
    let app = create_test_router();
    let (status, json) = send(&app, post_json("/entries", r#"{"subject_id": " ", "text": "sad"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_alert_not_found() {
    let app = create_test_router();
    let (status, _) = send(&app, get("/alerts/7d8f6c1e-2b1a-4c55-9a8e-3f0d2c4b5a69")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_alert_id() {
    let app = create_test_router();
    let (status, _) = send(&app, get("/alerts/nonexistent")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ws_preview_route_requires_upgrade() {
    let app = create_test_router();
    let status = send_raw(&app, get("/ws/preview")).await;

    // Routed to the websocket handler, which rejects a plain GET
    assert_ne!(status, StatusCode::NOT_FOUND);
    assert!(status.is_client_error());
}
