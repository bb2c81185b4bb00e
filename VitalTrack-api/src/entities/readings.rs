use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vital_track_domain::entities::{
    ClassifiedReading, CreateReadingRequest, MeasurementSet, Reading, StatusResult,
};

/// Public representation of a reading with the status of each vital sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadingResponse {
    pub id: i64,

    /// `YYYY-MM-DD`
    pub date: String,

    /// `HH:MM`
    pub time: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub blood_pressure_status: StatusResult,
    pub pulse_status: StatusResult,
    pub oxygen_status: StatusResult,
}

/// Readings matching a history query
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub count: usize,
    pub readings: Vec<ReadingResponse>,
}

/// Several takes of one measurement session
#[derive(Debug, Deserialize, ToSchema)]
pub struct AverageRequest {
    pub takes: Vec<MeasurementSet>,
}

/// Full JSON backup of the reading store
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BackupResponse {
    pub count: usize,
    pub readings: Vec<Reading>,
}

/// Readings to add back from a backup
#[derive(Debug, Deserialize, ToSchema)]
pub struct RestoreRequest {
    pub readings: Vec<CreateReadingRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestoreResponse {
    pub restored: usize,
}

/// Convert a classified domain reading to its public form
pub fn convert_to_public_reading(classified: ClassifiedReading) -> ReadingResponse {
    let ClassifiedReading {
        reading,
        blood_pressure_status,
        pulse_status,
        oxygen_status,
    } = classified;

    ReadingResponse {
        id: reading.id,
        date: reading.date,
        time: reading.time,
        period: reading.period,
        systolic: reading.systolic,
        diastolic: reading.diastolic,
        pulse: reading.pulse,
        oxygen: reading.oxygen,
        notes: reading.notes,
        blood_pressure_status,
        pulse_status,
        oxygen_status,
    }
}
