use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::aggregate::Metric;
use super::status::StatusResult;

/// Presentation order for readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse `asc`/`desc` (case-insensitive); anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// What a report should cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ReportOptions {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort: SortOrder,
    pub include_blood_pressure: bool,
    pub include_pulse: bool,
    pub include_oxygen: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            sort: SortOrder::Asc,
            include_blood_pressure: true,
            include_pulse: true,
            include_oxygen: true,
        }
    }
}

impl ReportOptions {
    /// Metrics selected for the report, in column order
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics = Vec::with_capacity(3);
        if self.include_blood_pressure {
            metrics.push(Metric::BloodPressure);
        }
        if self.include_pulse {
            metrics.push(Metric::Pulse);
        }
        if self.include_oxygen {
            metrics.push(Metric::Oxygen);
        }
        metrics
    }
}

/// One metric cell of a report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ReportCell {
    pub metric: Metric,
    /// Display value such as `120/80`, `72` or `97%`; absent when not recorded
    pub value: Option<String>,
    pub status: StatusResult,
}

/// One reading in a report table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ReportRow {
    pub id: i64,
    /// `DD/MM/YYYY`
    pub date: String,
    pub time: String,
    pub cells: Vec<ReportCell>,
    pub notes: Option<String>,
}

/// One x-axis point of the report chart; always oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ChartPoint {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen: Option<u16>,
}

/// One row of the thresholds reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ThresholdGuideRow {
    pub status: StatusResult,
    pub blood_pressure: String,
    pub pulse: String,
    pub oxygen: String,
}

/// Report data ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub chart: Vec<ChartPoint>,
    pub thresholds: Vec<ThresholdGuideRow>,
}
