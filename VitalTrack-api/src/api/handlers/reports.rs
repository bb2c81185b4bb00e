use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use vital_track_domain::entities::{DashboardSummary, Report, ReportOptions, SortOrder, ThresholdGuideRow};
use vital_track_domain::services::classifier::thresholds_guide;
use vital_track_domain::services::report::csv_file_name;

use super::readings::{parse_sort, ReadingServiceHandle};
use crate::entities::{BackupResponse, ErrorResponse, RestoreRequest, RestoreResponse};

/// Query parameters for the dashboard
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DashboardQueryParams {
    /// Reference time `YYYY-MM-DDTHH:MM[:SS]`; defaults to the server's local time
    pub now: Option<String>,
}

/// Query parameters for a report
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ReportQueryParams {
    /// Earliest date to include (`YYYY-MM-DD`, inclusive)
    pub start_date: Option<String>,

    /// Latest date to include (`YYYY-MM-DD`, inclusive)
    pub end_date: Option<String>,

    /// Table order (asc/desc, default: asc); the chart is always ascending
    pub sort: Option<String>,

    /// Include blood pressure (default: true)
    pub include_bp: Option<bool>,

    /// Include pulse (default: true)
    pub include_pulse: Option<bool>,

    /// Include oxygen (default: true)
    pub include_oxygen: Option<bool>,
}

impl ReportQueryParams {
    fn into_options(self) -> Result<ReportOptions, ErrorResponse> {
        Ok(ReportOptions {
            sort: parse_sort(self.sort.as_deref(), SortOrder::Asc)?,
            start_date: self.start_date,
            end_date: self.end_date,
            include_blood_pressure: self.include_bp.unwrap_or(true),
            include_pulse: self.include_pulse.unwrap_or(true),
            include_oxygen: self.include_oxygen.unwrap_or(true),
        })
    }
}

/// Parse the dashboard reference time
pub(crate) fn parse_now(now: Option<&str>) -> Result<NaiveDateTime, ErrorResponse> {
    let Some(raw) = now.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Local::now().naive_local());
    };

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| ErrorResponse::bad_request("now must be formatted as YYYY-MM-DDTHH:MM[:SS]"))
}

/// Readings from the last 24 hours and 7 day averages
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(DashboardQueryParams),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 400, description = "Invalid reference time", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(service))]
pub async fn get_dashboard(
    State(service): State<ReadingServiceHandle>,
    Query(params): Query<DashboardQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let now = parse_now(params.now.as_deref())?;
    let dashboard = service.get_dashboard(now).await?;

    info!(
        "Dashboard at {}: {} recent readings",
        now,
        dashboard.recent.len()
    );
    Ok(Json(dashboard))
}

/// Report table and chart data for a period
#[utoipa::path(
    get,
    path = "/api/v1/report",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "Report data", body = Report),
        (status = 400, description = "No metric selected or invalid sort", body = ErrorResponse),
        (status = 404, description = "No data found for selected period", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "reports"
)]
#[instrument(skip(service))]
pub async fn get_report(
    State(service): State<ReadingServiceHandle>,
    Query(params): Query<ReportQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let options = params.into_options()?;
    let report = service.build_report(&options).await?;

    info!("Report built with {} rows", report.rows.len());
    Ok(Json(report))
}

/// Reference table of the classification bands
#[utoipa::path(
    get,
    path = "/api/v1/thresholds",
    responses(
        (status = 200, description = "Thresholds guide", body = [ThresholdGuideRow]),
    ),
    tag = "reports"
)]
#[instrument]
pub async fn get_thresholds() -> impl IntoResponse {
    Json(thresholds_guide())
}

/// Download every reading as CSV
#[utoipa::path(
    get,
    path = "/api/v1/export/csv",
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 404, description = "No data to export", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "backup"
)]
#[instrument(skip(service))]
pub async fn export_csv(
    State(service): State<ReadingServiceHandle>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let csv = service.export_csv().await?;
    let file_name = csv_file_name(Local::now().date_naive());

    info!("Exporting readings as {}", file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        csv,
    ))
}

/// Download every reading as JSON
#[utoipa::path(
    get,
    path = "/api/v1/backup",
    responses(
        (status = 200, description = "All readings", body = BackupResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "backup"
)]
#[instrument(skip(service))]
pub async fn backup(
    State(service): State<ReadingServiceHandle>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let readings = service.backup().await?;

    Ok(Json(BackupResponse {
        count: readings.len(),
        readings,
    }))
}

/// Add back the readings of a JSON backup
#[utoipa::path(
    post,
    path = "/api/v1/restore",
    request_body = RestoreRequest,
    responses(
        (status = 200, description = "Readings restored", body = RestoreResponse),
        (status = 400, description = "Invalid backup entry", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "backup"
)]
#[instrument(skip(service, request))]
pub async fn restore(
    State(service): State<ReadingServiceHandle>,
    Json(request): Json<RestoreRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let restored = service.restore(request.readings).await.map_err(|e| {
        warn!("Restore rejected: {}", e);
        ErrorResponse::from(e)
    })?;

    Ok(Json(RestoreResponse { restored }))
}
