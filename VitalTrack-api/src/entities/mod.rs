// Public entities for the VitalTrack API
// Request and response shapes that only exist at the HTTP boundary

// Error responses
pub mod common;

// Reading, history, backup and restore payloads
pub mod readings;

pub use common::ErrorResponse;
pub use readings::{
    convert_to_public_reading, AverageRequest, BackupResponse, HistoryResponse, ReadingResponse,
    RestoreRequest, RestoreResponse,
};
