// Domain entities and value objects
pub mod aggregate;
pub mod conversions;
pub mod reading;
pub mod report;
pub mod status;

// Re-export common types for easier imports
pub use aggregate::{AggregateWindow, DashboardSummary, Metric, MetricValue, WindowAverages};
pub use reading::{ClassifiedReading, CreateReadingRequest, MeasurementSet, Reading};
pub use report::{ChartPoint, Report, ReportCell, ReportOptions, ReportRow, SortOrder, ThresholdGuideRow};
pub use status::{StatusLabel, StatusResult, StatusTier};
