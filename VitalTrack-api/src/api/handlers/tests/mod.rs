mod health_test;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use vital_track_data::models::Reading as DataReading;
use vital_track_domain::health::HealthService;
use vital_track_domain::services::create_mock_reading_service;

use crate::api::routes::create_app_with_services;

/// Router over the mock repository, seeded with `readings`
fn app_with(readings: Vec<DataReading>) -> Router {
    create_app_with_services(
        Arc::new(create_mock_reading_service(readings)),
        Arc::new(HealthService),
        false,
    )
}

fn stored(id: i64, date: &str, time: &str) -> DataReading {
    DataReading {
        id,
        date: date.to_string(),
        time: time.to_string(),
        period: None,
        systolic: Some(120),
        diastolic: Some(80),
        pulse: Some(70),
        oxygen: Some(98),
        notes: None,
    }
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

    TestResponse { status, headers, body }
}
