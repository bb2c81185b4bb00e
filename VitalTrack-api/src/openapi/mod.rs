use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Reading endpoints
        crate::api::handlers::readings::get_reading_history,
        crate::api::handlers::readings::create_reading,
        crate::api::handlers::readings::average_takes,
        crate::api::handlers::readings::get_reading,
        crate::api::handlers::readings::update_reading,
        crate::api::handlers::readings::delete_reading,

        // Dashboard and report endpoints
        crate::api::handlers::reports::get_dashboard,
        crate::api::handlers::reports::get_report,
        crate::api::handlers::reports::get_thresholds,

        // Export and backup endpoints
        crate::api::handlers::reports::export_csv,
        crate::api::handlers::reports::backup,
        crate::api::handlers::reports::restore
    ),
    components(
        schemas(
            // API entities
            crate::entities::common::ErrorResponse,
            crate::entities::readings::ReadingResponse,
            crate::entities::readings::HistoryResponse,
            crate::entities::readings::AverageRequest,
            crate::entities::readings::BackupResponse,
            crate::entities::readings::RestoreRequest,
            crate::entities::readings::RestoreResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain entities
            vital_track_domain::entities::Reading,
            vital_track_domain::entities::CreateReadingRequest,
            vital_track_domain::entities::ClassifiedReading,
            vital_track_domain::entities::MeasurementSet,
            vital_track_domain::entities::StatusResult,
            vital_track_domain::entities::StatusLabel,
            vital_track_domain::entities::StatusTier,
            vital_track_domain::entities::Metric,
            vital_track_domain::entities::MetricValue,
            vital_track_domain::entities::AggregateWindow,
            vital_track_domain::entities::WindowAverages,
            vital_track_domain::entities::DashboardSummary,
            vital_track_domain::entities::SortOrder,
            vital_track_domain::entities::Report,
            vital_track_domain::entities::ReportCell,
            vital_track_domain::entities::ReportRow,
            vital_track_domain::entities::ChartPoint,
            vital_track_domain::entities::ThresholdGuideRow
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "readings", description = "Reading management endpoints"),
        (name = "reports", description = "Dashboard, report and thresholds endpoints"),
        (name = "backup", description = "CSV export, backup and restore endpoints")
    ),
    info(
        title = "VitalTrack API",
        version = "0.1.0",
        description = "API for recording blood pressure, pulse and oxygen readings and classifying them",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
