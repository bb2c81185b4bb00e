use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};

use vital_track_domain::health::{
    ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus,
};
use vital_track_domain::services::create_mock_reading_service;

use super::send;
use crate::api::routes::create_app_with_services;

/// Health service that always reports the same database state
#[derive(Debug)]
struct FixedHealth {
    status: SystemStatus,
    database: ComponentStatus,
    details: &'static str,
}

#[async_trait]
impl HealthServiceTrait for FixedHealth {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();
        components.insert(
            "database".to_string(),
            HealthComponent {
                status: self.database,
                details: Some(self.details.to_string()),
            },
        );

        SystemHealth {
            status: self.status,
            components,
        }
    }
}

async fn check(health: FixedHealth) -> (StatusCode, serde_json::Value) {
    let app = create_app_with_services(
        Arc::new(create_mock_reading_service(vec![])),
        Arc::new(health),
        false,
    );

    let response = send(&app, Method::GET, "/health", None).await;
    (response.status, response.json())
}

#[tokio::test]
async fn test_health_check_healthy() {
    let (status, body) = check(FixedHealth {
        status: SystemStatus::Healthy,
        database: ComponentStatus::Healthy,
        details: "SQLite pool: healthy",
    })
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["database"]["status"], "ok");
    assert_eq!(body["components"]["api"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_check_degraded_still_serves() {
    let (status, body) = check(FixedHealth {
        status: SystemStatus::Degraded,
        database: ComponentStatus::Degraded,
        details: "using in-memory storage",
    })
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["database"]["message"], "using in-memory storage");
}

#[tokio::test]
async fn test_health_check_unhealthy() {
    let (status, body) = check(FixedHealth {
        status: SystemStatus::Unhealthy,
        database: ComponentStatus::Unhealthy,
        details: "connection error",
    })
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");
    assert_eq!(body["components"]["database"]["status"], "error");
}
