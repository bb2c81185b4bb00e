use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::entities::aggregate::DashboardSummary;
use crate::entities::conversions;
use crate::entities::reading::{ClassifiedReading, CreateReadingRequest, Reading};
use crate::entities::report::{Report, ReportOptions, SortOrder};
use crate::services::aggregation::build_dashboard;
use crate::services::classifier::classify_reading;
use crate::services::history::{filter_by_date_range, sort_readings};
use crate::services::report::{self, ReportError};
use vital_track_data::repository::{ReadingRepositoryTrait, RepositoryError};

/// Reading service errors
#[derive(Debug, Error)]
pub enum ReadingServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Reading not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Report or export could not be produced
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Trait for reading service operations
#[async_trait]
pub trait ReadingServiceTrait: Send + Sync {
    /// Validate a create or update request
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), ReadingServiceError>;

    /// Store a new reading
    async fn create_reading(&self, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError>;

    /// Replace an existing reading
    async fn update_reading(&self, id: i64, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError>;

    /// Delete a reading
    async fn delete_reading(&self, id: i64) -> Result<(), ReadingServiceError>;

    /// Get one reading with its statuses
    async fn get_reading_by_id(&self, id: i64) -> Result<ClassifiedReading, ReadingServiceError>;

    /// Get all readings, newest first
    async fn get_all_readings(&self) -> Result<Vec<Reading>, ReadingServiceError>;

    /// Recent readings and rolling averages as of `now`
    async fn get_dashboard(&self, now: NaiveDateTime) -> Result<DashboardSummary, ReadingServiceError>;

    /// Classified readings within an optional date range
    async fn get_history(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
        sort: SortOrder,
    ) -> Result<Vec<ClassifiedReading>, ReadingServiceError>;

    /// Report data for the selected period and metrics
    async fn build_report(&self, options: &ReportOptions) -> Result<Report, ReadingServiceError>;

    /// All readings as CSV, newest first
    async fn export_csv(&self) -> Result<String, ReadingServiceError>;

    /// All readings for a JSON backup
    async fn backup(&self) -> Result<Vec<Reading>, ReadingServiceError>;

    /// Add every reading of a backup; nothing is stored unless all entries are valid
    async fn restore(&self, requests: Vec<CreateReadingRequest>) -> Result<usize, ReadingServiceError>;
}

/// Reading service for domain logic
pub struct ReadingService<R: ReadingRepositoryTrait> {
    repository: R,
}

impl<R: ReadingRepositoryTrait> ReadingService<R> {
    /// Create a new reading service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ReadingServiceError {
        match err {
            RepositoryError::NotFound(msg) => ReadingServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => ReadingServiceError::ValidationError(msg),
            _ => ReadingServiceError::RepositoryError(err.to_string()),
        }
    }

    async fn load_all(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        let data_readings = self
            .repository
            .get_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(data_readings
            .into_iter()
            .map(conversions::convert_to_domain_reading)
            .collect())
    }

    /// Zero values are dropped before validation so `0` means "not recorded"
    fn prepare(&self, request: CreateReadingRequest) -> Result<CreateReadingRequest, ReadingServiceError> {
        let request = request.without_zero_values();
        self.validate_create_request(&request)?;
        Ok(request)
    }
}

fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[async_trait]
impl<R: ReadingRepositoryTrait + Send + Sync> ReadingServiceTrait for ReadingService<R> {
    fn validate_create_request(&self, request: &CreateReadingRequest) -> Result<(), ReadingServiceError> {
        if let Err(validation_errors) = request.validate() {
            return Err(ReadingServiceError::ValidationError(
                describe_validation_errors(&validation_errors),
            ));
        }

        if request.systolic.is_some() != request.diastolic.is_some() {
            return Err(ReadingServiceError::ValidationError(
                "Systolic and diastolic must be recorded together".to_string(),
            ));
        }

        Ok(())
    }

    async fn create_reading(&self, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError> {
        let request = self.prepare(request)?;
        let data_request = conversions::convert_to_data_create_request(&request);

        let data_reading = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        debug!("Created reading {}", data_reading.id);
        Ok(conversions::convert_to_domain_reading(data_reading))
    }

    async fn update_reading(&self, id: i64, request: CreateReadingRequest) -> Result<Reading, ReadingServiceError> {
        let request = self.prepare(request)?;
        let data_request = conversions::convert_to_data_create_request(&request);

        let data_reading = self
            .repository
            .update(id, data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(conversions::convert_to_domain_reading(data_reading))
    }

    async fn delete_reading(&self, id: i64) -> Result<(), ReadingServiceError> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn get_reading_by_id(&self, id: i64) -> Result<ClassifiedReading, ReadingServiceError> {
        let data_reading = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| ReadingServiceError::NotFound(format!("Reading with ID {} not found", id)))?;

        Ok(classify_reading(conversions::convert_to_domain_reading(data_reading)))
    }

    async fn get_all_readings(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        self.load_all().await
    }

    async fn get_dashboard(&self, now: NaiveDateTime) -> Result<DashboardSummary, ReadingServiceError> {
        let readings = self.load_all().await?;
        Ok(build_dashboard(&readings, now))
    }

    async fn get_history(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
        sort: SortOrder,
    ) -> Result<Vec<ClassifiedReading>, ReadingServiceError> {
        let readings = self.load_all().await?;
        let mut filtered = filter_by_date_range(&readings, start_date.as_deref(), end_date.as_deref());
        sort_readings(&mut filtered, sort);

        Ok(filtered.into_iter().map(classify_reading).collect())
    }

    async fn build_report(&self, options: &ReportOptions) -> Result<Report, ReadingServiceError> {
        let readings = self.load_all().await?;
        Ok(report::build_report(&readings, options)?)
    }

    async fn export_csv(&self) -> Result<String, ReadingServiceError> {
        let readings = self.load_all().await?;
        Ok(report::export_csv(&readings)?)
    }

    async fn backup(&self) -> Result<Vec<Reading>, ReadingServiceError> {
        self.load_all().await
    }

    async fn restore(&self, requests: Vec<CreateReadingRequest>) -> Result<usize, ReadingServiceError> {
        let mut prepared = Vec::with_capacity(requests.len());
        for (index, request) in requests.into_iter().enumerate() {
            let request = self.prepare(request).map_err(|e| match e {
                ReadingServiceError::ValidationError(msg) => {
                    ReadingServiceError::ValidationError(format!("Entry {}: {}", index + 1, msg))
                }
                other => other,
            })?;
            prepared.push(conversions::convert_to_data_create_request(&request));
        }

        let total = prepared.len();
        let restored = self.repository.create_many(prepared).await.map_err(|e| {
            warn!("Restore of {} readings rolled back: {}", total, e);
            self.map_repo_error(e)
        })?;

        info!("Restored {} readings", restored.len());
        Ok(restored.len())
    }
}

/// Create a default reading service using the repository from data layer
pub fn create_default_reading_service() -> impl ReadingServiceTrait {
    let repository = vital_track_data::repository::ReadingRepository::new();
    ReadingService::new(repository)
}

/// Create a reading service over the hand-written mock repository.
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_reading_service(
    readings: Vec<vital_track_data::models::Reading>,
) -> ReadingService<vital_track_data::repository::mock::MockReadingRepository> {
    ReadingService::new(vital_track_data::repository::mock::MockReadingRepository::with_readings(readings))
}
