use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::reading::ClassifiedReading;
use super::status::StatusResult;

/// Vital sign an aggregate is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Metric {
    BloodPressure,
    Pulse,
    Oxygen,
}

impl Metric {
    /// Column heading used by reports
    pub fn title(self) -> &'static str {
        match self {
            Metric::BloodPressure => "Blood Pressure",
            Metric::Pulse => "Pulse",
            Metric::Oxygen => "Oxygen",
        }
    }
}

/// Rounded mean of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum MetricValue {
    BloodPressure { systolic: u16, diastolic: u16 },
    Single(u16),
}

/// Count, mean and status of one metric over a reading subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AggregateWindow {
    pub metric: Metric,

    /// Number of readings that carried this metric
    pub count: usize,

    /// Rounded mean; absent when `count` is zero
    pub mean: Option<MetricValue>,

    /// Classification of the rounded mean
    pub status: StatusResult,
}

impl AggregateWindow {
    /// Aggregate for a metric with no qualifying readings
    pub fn empty(metric: Metric) -> Self {
        Self {
            metric,
            count: 0,
            mean: None,
            status: StatusResult::UNKNOWN,
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// Per-metric aggregates over one time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct WindowAverages {
    pub blood_pressure: AggregateWindow,
    pub pulse: AggregateWindow,
    pub oxygen: AggregateWindow,

    /// Inclusive lower bound of the window
    pub window_start: NaiveDateTime,

    /// Caller-supplied "now" the window was computed against
    pub generated_at: NaiveDateTime,
}

/// Dashboard view: trailing 24h rows plus trailing 7 day averages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DashboardSummary {
    /// Readings from the last 24 hours, in store order
    pub recent: Vec<ClassifiedReading>,

    /// Averages over the last seven days
    pub averages: WindowAverages,
}
