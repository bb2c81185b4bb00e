use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use vital_track_api::api::create_application;
use vital_track_api::config::ServerConfig;

// Initialize tracing once for all tests
static INIT: std::sync::Once = std::sync::Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_health_without_database_is_degraded() {
    initialize();
    let app = create_application(&ServerConfig::default());

    let (status, body) = call(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = json_of(&body);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["api"]["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    initialize();
    let app = create_application(&ServerConfig::default());

    let (status, body) = call(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["info"]["title"], "VitalTrack API");
}

#[tokio::test]
async fn test_swagger_can_be_disabled() {
    initialize();
    let config = ServerConfig {
        enable_swagger: false,
        ..ServerConfig::default()
    };
    let app = create_application(&config);

    let (status, _) = call(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reading_lifecycle_with_in_memory_store() {
    initialize();
    let app = create_application(&ServerConfig::default());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/readings",
        Some(json!({
            "date": "2024-06-09",
            "time": "09:15",
            "systolic": 118,
            "diastolic": 76,
            "pulse": 0,
            "oxygen": 93
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = json_of(&body);
    let id = created["id"].as_i64().unwrap();
    assert!(created.get("pulse").is_none());
    assert_eq!(created["pulse_status"]["label"], "-");
    assert_eq!(created["oxygen_status"]["label"], "Low");

    let (status, body) = call(&app, Method::GET, "/api/v1/dashboard?now=2024-06-09T20:00", None).await;
    assert_eq!(status, StatusCode::OK);
    let dashboard = json_of(&body);
    assert_eq!(dashboard["recent"][0]["id"], id);
    assert_eq!(dashboard["averages"]["oxygen"]["mean"], 93);
    assert_eq!(dashboard["averages"]["pulse"]["count"], 0);

    let (status, body) = call(&app, Method::GET, "/api/v1/export/csv", None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(body).unwrap();
    assert!(csv.lines().any(|line| line == "09/06/2024,09:15,,118,76,,93,"));

    let uri = format!("/api/v1/readings/{}", id);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
