use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use vital_track_domain::entities::{CreateReadingRequest, MeasurementSet, SortOrder};
use vital_track_domain::services::aggregation::average_measurements;
use vital_track_domain::services::classifier::classify_reading;
use vital_track_domain::services::{create_default_reading_service, ReadingServiceTrait};

use crate::entities::{
    convert_to_public_reading, AverageRequest, ErrorResponse, HistoryResponse, ReadingResponse,
};

/// Service type for dependency injection
pub type ReadingServiceHandle = Arc<dyn ReadingServiceTrait>;

/// Create a default service for the handlers to use
pub fn create_service() -> ReadingServiceHandle {
    Arc::new(create_default_reading_service())
}

/// Query parameters for the reading history
#[derive(Debug, Default, Deserialize, Clone, IntoParams, ToSchema)]
pub struct HistoryQueryParams {
    /// Earliest date to include (`YYYY-MM-DD`, inclusive)
    pub start_date: Option<String>,

    /// Latest date to include (`YYYY-MM-DD`, inclusive)
    pub end_date: Option<String>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

/// Parse an optional `asc`/`desc` query value
pub(crate) fn parse_sort(sort: Option<&str>, default: SortOrder) -> Result<SortOrder, ErrorResponse> {
    match sort.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(raw) => SortOrder::parse(raw)
            .ok_or_else(|| ErrorResponse::bad_request("sort must be 'asc' or 'desc'")),
    }
}

/// Get readings within an optional date range
#[utoipa::path(
    get,
    path = "/api/v1/readings",
    params(HistoryQueryParams),
    responses(
        (status = 200, description = "Reading history retrieved", body = HistoryResponse),
        (status = 400, description = "Invalid sort order", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn get_reading_history(
    State(service): State<ReadingServiceHandle>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let sort = parse_sort(params.sort.as_deref(), SortOrder::Desc)?;

    let readings = service
        .get_history(params.start_date, params.end_date, sort)
        .await?;

    let readings: Vec<ReadingResponse> = readings.into_iter().map(convert_to_public_reading).collect();
    info!("Returning {} readings", readings.len());

    Ok(Json(HistoryResponse {
        count: readings.len(),
        readings,
    }))
}

/// Get a single reading by ID
#[utoipa::path(
    get,
    path = "/api/v1/readings/{id}",
    params(
        ("id" = i64, Path, description = "Reading ID")
    ),
    responses(
        (status = 200, description = "Reading found", body = ReadingResponse),
        (status = 404, description = "Reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn get_reading(
    State(service): State<ReadingServiceHandle>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let reading = service.get_reading_by_id(id).await?;
    Ok(Json(convert_to_public_reading(reading)))
}

/// Record a new reading
#[utoipa::path(
    post,
    path = "/api/v1/readings",
    request_body = CreateReadingRequest,
    responses(
        (status = 201, description = "Reading created", body = ReadingResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service, request))]
pub async fn create_reading(
    State(service): State<ReadingServiceHandle>,
    Json(request): Json<CreateReadingRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let reading = service.create_reading(request).await.map_err(|e| {
        warn!("Reading rejected: {}", e);
        ErrorResponse::from(e)
    })?;

    info!("Reading created with ID: {}", reading.id);
    Ok((
        StatusCode::CREATED,
        Json(convert_to_public_reading(classify_reading(reading))),
    ))
}

/// Replace an existing reading
#[utoipa::path(
    put,
    path = "/api/v1/readings/{id}",
    params(
        ("id" = i64, Path, description = "Reading ID")
    ),
    request_body = CreateReadingRequest,
    responses(
        (status = 200, description = "Reading updated", body = ReadingResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service, request))]
pub async fn update_reading(
    State(service): State<ReadingServiceHandle>,
    Path(id): Path<i64>,
    Json(request): Json<CreateReadingRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let reading = service.update_reading(id, request).await?;

    info!("Reading {} updated", id);
    Ok(Json(convert_to_public_reading(classify_reading(reading))))
}

/// Delete a reading
#[utoipa::path(
    delete,
    path = "/api/v1/readings/{id}",
    params(
        ("id" = i64, Path, description = "Reading ID")
    ),
    responses(
        (status = 204, description = "Reading deleted"),
        (status = 404, description = "Reading not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(service))]
pub async fn delete_reading(
    State(service): State<ReadingServiceHandle>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ErrorResponse> {
    service.delete_reading(id).await?;

    info!("Reading {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Average several takes of one measurement session
#[utoipa::path(
    post,
    path = "/api/v1/readings/average",
    request_body = AverageRequest,
    responses(
        (status = 200, description = "Field-by-field rounded averages", body = MeasurementSet),
        (status = 400, description = "No takes supplied", body = ErrorResponse),
    ),
    tag = "readings"
)]
#[instrument(skip(request))]
pub async fn average_takes(
    Json(request): Json<AverageRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    if request.takes.is_empty() {
        return Err(ErrorResponse::bad_request("At least one take is required"));
    }

    Ok(Json(average_measurements(&request.takes)))
}
