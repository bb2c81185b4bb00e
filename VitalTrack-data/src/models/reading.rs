use serde::{Deserialize, Serialize};

/// Storage model for a vital-sign reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Store-assigned identifier
    pub id: i64,

    /// Calendar date of the reading (`YYYY-MM-DD`)
    pub date: String,

    /// Clock time of the reading (`HH:MM`)
    pub time: String,

    /// Optional free-text period label (e.g. "Morning")
    pub period: Option<String>,

    /// Systolic blood pressure in mmHg
    pub systolic: Option<u16>,

    /// Diastolic blood pressure in mmHg
    pub diastolic: Option<u16>,

    /// Pulse rate in beats per minute
    pub pulse: Option<u16>,

    /// Blood oxygen saturation in percent
    pub oxygen: Option<u16>,

    /// Optional notes about the reading
    pub notes: Option<String>,
}

/// Input data for creating or replacing a reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReadingRequest {
    pub date: String,
    pub time: String,
    pub period: Option<String>,
    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,
    pub pulse: Option<u16>,
    pub oxygen: Option<u16>,
    pub notes: Option<String>,
}

impl CreateReadingRequest {
    /// Materialize the request as a stored reading with the given id
    pub fn into_reading(self, id: i64) -> Reading {
        Reading {
            id,
            date: self.date,
            time: self.time,
            period: self.period,
            systolic: self.systolic,
            diastolic: self.diastolic,
            pulse: self.pulse,
            oxygen: self.oxygen,
            notes: self.notes,
        }
    }
}

/// Newest-first ordering used by every listing the store returns
pub fn sort_newest_first(readings: &mut [Reading]) {
    readings.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.time.cmp(&a.time))
            .then_with(|| b.id.cmp(&a.id))
    });
}
