//! Integration tests for the mock analysis service routes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use thinklens_core::mock_server::{MockState, router};
use thinklens_core::{MethodPanel, ThinkingMethod, normalize};
use tower::ServiceExt;

async fn post(body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("content-type", "application/json; charset=utf-8")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    let resp = router(MockState::default()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 100_000)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_response_normalizes_into_every_panel() {
    let (status, body) = post(json!({
        "text": "Volcanoes release magma. Eruptions reshape landscapes over centuries.",
        "methods": ["all"],
        "use_ai": false
    }))
    .await;
    assert_eq!(status, StatusCode::OK);

    let view = normalize(&body);
    assert!(view.error.is_none());
    assert_eq!(view.concepts.first().map(String::as_str), Some("volcanoes"));
    assert!(view.complexity.is_some());
    for method in ThinkingMethod::ALL {
        assert!(
            matches!(view.panel(method), MethodPanel::Categories(c) if !c.is_empty()),
            "{method} panel should have categories"
        );
    }
}

#[tokio::test]
async fn test_requested_subset_only() {
    let (_, body) = post(json!({"text": "Short text.", "methods": ["socratic"]})).await;
    let view = normalize(&body);
    assert!(matches!(view.socratic, MethodPanel::Categories(_)));
    assert_eq!(view.multi_level, MethodPanel::Missing);
    assert_eq!(view.practice, MethodPanel::Missing);
}

#[tokio::test]
async fn test_content_type_with_charset_accepted() {
    let (status, _) = post(json!({"text": "ok"})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let req = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let resp = router(MockState::default()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
