//! Integration tests for polann-ui API endpoints
//!
//! Tests cover:
//! - Health and build info endpoints
//! - Item registration and browsing
//! - Judgment upsert/clear with role checks
//! - Adjudication (final decisions)
//! - Agreement report, including the insufficient-data notice
//! - Adjudicator queue and annotator navigation

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use polann_ui::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app over a fresh in-memory database
async fn setup_app() -> Router {
    let pool = polann_common::db::init_in_memory()
        .await
        .expect("Should create in-memory database");
    build_router(AppState::new(pool))
}

/// Test helper: send a request and return status + JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, value)
}

/// Test helper: register `count` items, returning their ids
async fn seed_items(app: &Router, count: usize) -> Vec<i64> {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "external_key": format!("c-{}", i),
                "text": format!("comment number {}", i),
                "title": "Election coverage",
                "like_count": i,
            })
        })
        .collect();

    let (status, body) = send(app, "POST", "/api/items", Some(Value::Array(items))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inserted"], count as u64);

    let (_, list) = send(app, "GET", "/api/items", None).await;
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

async fn judge(
    app: &Router,
    item_id: i64,
    role: &str,
    sentiment: &str,
    discourse: &str,
) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/api/items/{}/judgments/{}", item_id, role),
        Some(json!({ "sentiment": sentiment, "discourse": discourse })),
    )
    .await
}

// =============================================================================
// Health / build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "polann-ui");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let pool = polann_common::db::init_in_memory().await.unwrap();
    let app = build_router(AppState::new(pool.clone()));
    pool.close().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let app = setup_app().await;

    let (status, body) = send(&app, "GET", "/api/buildinfo", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// Items
// =============================================================================

#[tokio::test]
async fn test_register_items_skips_duplicates() {
    let app = setup_app().await;
    seed_items(&app, 2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/items",
        Some(json!([
            { "external_key": "c-0", "text": "again" },
            { "external_key": "new", "text": "fresh" }
        ])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submitted"], 2);
    assert_eq!(body["inserted"], 1);
}

#[tokio::test]
async fn test_register_empty_batch_rejected() {
    let app = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/items", Some(json!([]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_item_detail_and_missing_item() {
    let app = setup_app().await;
    let ids = seed_items(&app, 1).await;

    let (status, body) = send(&app, "GET", &format!("/api/items/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["external_key"], "c-0");
    assert_eq!(body["state"], "INCOMPLETE");
    assert!(body["disagreement"].is_null());

    let (status, body) = send(&app, "GET", "/api/items/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Judgments and state transitions
// =============================================================================

#[tokio::test]
async fn test_item_state_follows_judgments() {
    let app = setup_app().await;
    let id = seed_items(&app, 1).await[0];

    let (status, body) = judge(&app, id, "annotator1", "positive", "partisan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "INCOMPLETE");
    assert_eq!(body["judgment"]["role"], "annotator1");

    let (_, body) = judge(&app, id, "annotator2", "positive", "partisan").await;
    assert_eq!(body["state"], "COMPLETE_AGREE");

    // Resubmission replaces annotator2's labels
    let (_, body) = judge(&app, id, "annotator2", "positive", "objective").await;
    assert_eq!(body["state"], "COMPLETE_DISAGREE");

    let (_, detail) = send(&app, "GET", &format!("/api/items/{}", id), None).await;
    assert_eq!(detail["judgments"].as_array().unwrap().len(), 2);
    assert_eq!(detail["disagreement"]["sentiment"], false);
    assert_eq!(detail["disagreement"]["discourse"], true);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/items/{}/judgments/annotator2", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["state"], "INCOMPLETE");
}

#[tokio::test]
async fn test_adjudicator_cannot_submit_judgment() {
    let app = setup_app().await;
    let id = seed_items(&app, 1).await[0];

    let (status, body) = judge(&app, id, "adjudicator", "neutral", "objective").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_unknown_role_and_label_rejected() {
    let app = setup_app().await;
    let id = seed_items(&app, 1).await[0];

    let (status, body) = judge(&app, id, "annotator3", "neutral", "objective").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Body fails to deserialize into the fixed label set
    let (status, body) = judge(&app, id, "annotator1", "sarcastic", "objective").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("sarcastic"));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/items/{}/decision/adjudicator", id),
        Some(json!({ "sentiment": "neutral", "discourse": "centrist" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Nothing was stored
    let (_, detail) = send(&app, "GET", &format!("/api/items/{}", id), None).await;
    assert_eq!(detail["judgments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_requests_use_error_shape() {
    let app = setup_app().await;
    let id = seed_items(&app, 1).await[0];

    // Not JSON at all
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/items/{}/judgments/annotator1", id))
        .header("content-type", "application/json")
        .body(Body::from("{sentiment: positive"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("Error body should be JSON");
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Non-numeric item id
    let (status, body) = send(&app, "GET", "/api/items/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = judge(&app, -1, "annotator1", "neutral", "objective").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let uri = "/api/items/first/judgments/annotator1";
    let (status, body) = send(&app, "DELETE", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Registration payload must be an array of items
    let (status, body) = send(&app, "POST", "/api/items", Some(json!({ "text": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_judgment_on_missing_item() {
    let app = setup_app().await;

    let (status, _) = judge(&app, 404, "annotator1", "neutral", "objective").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Adjudication
// =============================================================================

#[tokio::test]
async fn test_only_adjudicator_finalizes() {
    let app = setup_app().await;
    let id = seed_items(&app, 1).await[0];
    judge(&app, id, "annotator1", "negative", "partisan").await;
    judge(&app, id, "annotator2", "neutral", "partisan").await;

    let decision = json!({ "sentiment": "negative", "discourse": "partisan" });

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/items/{}/decision/annotator1", id),
        Some(decision.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/items/{}/decision/adjudicator", id),
        Some(decision),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "FINALIZED");
    assert_eq!(body["final_decision"]["sentiment"], "negative");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/items/{}/decision/adjudicator", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "COMPLETE_DISAGREE");
}

// =============================================================================
// Agreement
// =============================================================================

#[tokio::test]
async fn test_agreement_notice_without_pairs() {
    let app = setup_app().await;
    let id = seed_items(&app, 2).await[0];
    judge(&app, id, "annotator1", "positive", "partisan").await;

    let (status, body) = send(&app, "GET", "/api/agreement", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["complete_pairs"], 0);
    assert_eq!(body["incomplete_items"], 1);
    assert_eq!(body["sentiment"]["status"], "notice");
    assert_eq!(body["discourse"]["status"], "notice");
}

#[tokio::test]
async fn test_agreement_report() {
    let app = setup_app().await;
    let ids = seed_items(&app, 4).await;

    // Sentiment: A,A,B,B vs A,B,A,B -> kappa 0
    let labels = [
        ("positive", "positive"),
        ("positive", "negative"),
        ("negative", "positive"),
        ("negative", "negative"),
    ];
    for (id, (s1, s2)) in ids.iter().zip(labels) {
        judge(&app, *id, "annotator1", s1, "objective").await;
        judge(&app, *id, "annotator2", s2, "objective").await;
    }

    let (status, body) = send(&app, "GET", "/api/agreement", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["complete_pairs"], 4);

    let sentiment = &body["sentiment"];
    assert_eq!(sentiment["status"], "report");
    assert_eq!(sentiment["labels"], json!(["positive", "negative", "neutral"]));
    assert_eq!(sentiment["matrix"], json!([[1, 1, 0], [1, 1, 0], [0, 0, 0]]));
    assert_eq!(sentiment["observed_agreement"], 0.5);
    assert_eq!(sentiment["expected_agreement"], 0.5);
    assert_eq!(sentiment["kappa"], 0.0);

    // Discourse: every judgment "objective" -> degenerate kappa 1
    let discourse = &body["discourse"];
    assert_eq!(discourse["expected_agreement"], 1.0);
    assert_eq!(discourse["kappa"], 1.0);
    assert_eq!(discourse["interpretation"], "Almost Perfect");
}

// =============================================================================
// Queue navigation
// =============================================================================

#[tokio::test]
async fn test_queue_prioritizes_disagreements() {
    let app = setup_app().await;
    let ids = seed_items(&app, 4).await;

    judge(&app, ids[0], "annotator1", "positive", "partisan").await;
    judge(&app, ids[0], "annotator2", "positive", "partisan").await;
    judge(&app, ids[1], "annotator1", "positive", "partisan").await;
    judge(&app, ids[1], "annotator2", "negative", "partisan").await;
    judge(&app, ids[2], "annotator1", "neutral", "objective").await;
    judge(&app, ids[2], "annotator2", "neutral", "non_polarized").await;

    let (status, body) = send(&app, "GET", "/api/queue/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_id"], ids[1]);
    assert_eq!(body["state"], "COMPLETE_DISAGREE");

    let (_, summary) = send(&app, "GET", "/api/queue/summary", None).await;
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["incomplete"], 1);
    assert_eq!(summary["complete_agree"], 1);
    assert_eq!(summary["complete_disagree"], 2);
    assert_eq!(summary["finalized"], 0);
}

#[tokio::test]
async fn test_queue_drains() {
    let app = setup_app().await;
    let id = seed_items(&app, 1).await[0];
    judge(&app, id, "annotator1", "positive", "partisan").await;
    judge(&app, id, "annotator2", "positive", "partisan").await;

    let (_, body) = send(&app, "GET", "/api/queue/next", None).await;
    assert_eq!(body["item_id"], id);
    assert_eq!(body["state"], "COMPLETE_AGREE");

    send(
        &app,
        "PUT",
        &format!("/api/items/{}/decision/adjudicator", id),
        Some(json!({ "sentiment": "positive", "discourse": "partisan" })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/queue/next", None).await;
    assert!(body["item_id"].is_null());
    assert!(body["state"].is_null());
}

#[tokio::test]
async fn test_next_unannotated_per_annotator() {
    let app = setup_app().await;
    let ids = seed_items(&app, 3).await;
    judge(&app, ids[0], "annotator1", "positive", "partisan").await;

    let (_, body) = send(&app, "GET", "/api/annotators/annotator1/next", None).await;
    assert_eq!(body["role"], "annotator1");
    assert_eq!(body["item_id"], ids[1]);

    let (_, body) = send(&app, "GET", "/api/annotators/annotator2/next", None).await;
    assert_eq!(body["item_id"], ids[0]);

    let (status, _) = send(&app, "GET", "/api/annotators/adjudicator/next", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
