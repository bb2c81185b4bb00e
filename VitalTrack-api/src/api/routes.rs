use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::api::handlers::health::{self, HealthServiceHandle};
use crate::api::handlers::readings::{self, ReadingServiceHandle};
use crate::api::handlers::{
    average_takes, backup, create_reading, delete_reading, export_csv, get_dashboard,
    get_reading, get_reading_history, get_report, get_thresholds, health_check, restore,
    update_reading,
};
use crate::openapi::configure_swagger_routes;

/// Create the application router backed by the default services
pub fn create_app(enable_swagger: bool) -> Router {
    debug!("Creating application router");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    create_app_with_services(
        readings::create_service(),
        health::create_health_service(),
        enable_swagger,
    )
}

/// Create the application router around the given services
pub fn create_app_with_services(
    reading_service: ReadingServiceHandle,
    health_service: HealthServiceHandle,
    enable_swagger: bool,
) -> Router {
    // Define specific routes before parametrized routes to avoid conflicts
    let api_routes = Router::new()
        .route("/readings", get(get_reading_history).post(create_reading))
        .route("/readings/average", post(average_takes))
        .route(
            "/readings/:id",
            get(get_reading).put(update_reading).delete(delete_reading),
        )
        .route("/dashboard", get(get_dashboard))
        .route("/report", get(get_report))
        .route("/thresholds", get(get_thresholds))
        .route("/export/csv", get(export_csv))
        .route("/backup", get(backup))
        .route("/restore", post(restore))
        .with_state(reading_service);

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .layer(Extension(health_service));

    let mut app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes);

    if enable_swagger {
        app = add_swagger_ui(app);
        debug!("Swagger UI merged");
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
