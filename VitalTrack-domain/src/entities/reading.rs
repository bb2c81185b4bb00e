use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::status::StatusResult;

/// Storage format of the `date` field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format of the `time` field
pub const TIME_FORMAT: &str = "%H:%M";

/// Domain model for a single recorded observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Reading {
    /// Store-assigned identifier
    pub id: i64,

    /// Calendar date (`YYYY-MM-DD`)
    pub date: String,

    /// Clock time (`HH:MM`)
    pub time: String,

    /// Optional period label such as "Morning"
    pub period: Option<String>,

    /// Systolic blood pressure in mmHg
    pub systolic: Option<u16>,

    /// Diastolic blood pressure in mmHg
    pub diastolic: Option<u16>,

    /// Pulse in beats per minute
    pub pulse: Option<u16>,

    /// Blood oxygen saturation in percent
    pub oxygen: Option<u16>,

    /// Optional free-text notes
    pub notes: Option<String>,
}

/// Zero is indistinguishable from "not recorded" for every vital sign
pub(crate) fn present(value: Option<u16>) -> Option<u16> {
    value.filter(|&v| v != 0)
}

/// Parse a fixed-width `YYYY-MM-DD` date; chrono alone would accept `2024-1-5`
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    if date.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Parse a fixed-width `HH:MM` (or `HH:MM:SS`) time
pub fn parse_time(time: &str) -> Option<NaiveTime> {
    match time.len() {
        5 => NaiveTime::parse_from_str(time, TIME_FORMAT).ok(),
        8 => NaiveTime::parse_from_str(time, "%H:%M:%S").ok(),
        _ => None,
    }
}

impl Reading {
    /// Combined local timestamp of `date` and `time`, if both parse
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        Some(parse_date(&self.date)?.and_time(parse_time(&self.time)?))
    }

    /// Systolic/diastolic pair when both are recorded
    pub fn blood_pressure(&self) -> Option<(u16, u16)> {
        Some((present(self.systolic)?, present(self.diastolic)?))
    }

    /// Pulse when recorded
    pub fn pulse_value(&self) -> Option<u16> {
        present(self.pulse)
    }

    /// Oxygen saturation when recorded
    pub fn oxygen_value(&self) -> Option<u16> {
        present(self.oxygen)
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Dates must be real, zero-padded `YYYY-MM-DD` so string comparison orders them
pub fn validate_reading_date(date: &str) -> Result<(), ValidationError> {
    if parse_date(date).is_none() {
        return Err(validation_error("date", "Date must be a valid YYYY-MM-DD date"));
    }
    Ok(())
}

/// Times must be zero-padded 24-hour `HH:MM`
pub fn validate_reading_time(time: &str) -> Result<(), ValidationError> {
    if time.len() != 5 || parse_time(time).is_none() {
        return Err(validation_error("time", "Time must be a valid 24-hour HH:MM time"));
    }
    Ok(())
}

/// Request payload for creating or replacing a reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateReadingRequest {
    /// Calendar date (`YYYY-MM-DD`)
    #[validate(custom = "validate_reading_date")]
    pub date: String,

    /// Clock time (`HH:MM`)
    #[validate(custom = "validate_reading_time")]
    pub time: String,

    /// Optional period label
    #[serde(default)]
    #[validate(length(max = 50, message = "Period cannot exceed 50 characters"))]
    pub period: Option<String>,

    /// Systolic blood pressure in mmHg
    #[serde(default, alias = "sys")]
    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub systolic: Option<u16>,

    /// Diastolic blood pressure in mmHg
    #[serde(default, alias = "dia")]
    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub diastolic: Option<u16>,

    /// Pulse in beats per minute
    #[serde(default)]
    #[validate(range(min = 20, max = 250, message = "Pulse must be between 20 and 250"))]
    pub pulse: Option<u16>,

    /// Blood oxygen saturation in percent
    #[serde(default)]
    #[validate(range(min = 50, max = 100, message = "Oxygen must be between 50 and 100"))]
    pub oxygen: Option<u16>,

    /// Optional free-text notes
    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

impl CreateReadingRequest {
    /// Drop zero vital signs so they are stored as not recorded
    pub fn without_zero_values(self) -> Self {
        Self {
            systolic: present(self.systolic),
            diastolic: present(self.diastolic),
            pulse: present(self.pulse),
            oxygen: present(self.oxygen),
            ..self
        }
    }
}

/// A reading together with the status of each of its vital signs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ClassifiedReading {
    #[serde(flatten)]
    pub reading: Reading,
    pub blood_pressure_status: StatusResult,
    pub pulse_status: StatusResult,
    pub oxygen_status: StatusResult,
}

/// One take of a multi-take measurement session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MeasurementSet {
    #[serde(default)]
    pub systolic: Option<u16>,
    #[serde(default)]
    pub diastolic: Option<u16>,
    #[serde(default)]
    pub pulse: Option<u16>,
}
