pub mod aggregation;
pub mod classifier;
pub mod history;
pub mod readings;
pub mod report;

// Domain services
// The classifier, aggregation, history and report modules are pure functions
// over reading snapshots; `readings` wraps them around the repository.

pub use readings::{
    create_default_reading_service, ReadingService, ReadingServiceError, ReadingServiceTrait,
};
pub use report::ReportError;

#[cfg(feature = "mock")]
pub use readings::create_mock_reading_service;
