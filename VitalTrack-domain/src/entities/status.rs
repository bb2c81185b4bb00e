use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Classification label for a single vital-sign value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum StatusLabel {
    /// No usable value (absent or zero)
    #[serde(rename = "-")]
    Unknown,
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Good,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl StatusLabel {
    /// Display text for the label
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Unknown => "-",
            StatusLabel::VeryLow => "Very Low",
            StatusLabel::Low => "Low",
            StatusLabel::Good => "Good",
            StatusLabel::High => "High",
            StatusLabel::VeryHigh => "Very High",
        }
    }

    /// Styling tier the label belongs to
    pub fn tier(self) -> StatusTier {
        match self {
            StatusLabel::Unknown => StatusTier::None,
            StatusLabel::Good => StatusTier::Good,
            StatusLabel::Low | StatusLabel::High => StatusTier::Abnormal,
            StatusLabel::VeryLow | StatusLabel::VeryHigh => StatusTier::Severe,
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal styling tier; higher is more severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum StatusTier {
    None,
    Good,
    Abnormal,
    Severe,
}

/// Derived status for one value; recomputed on every read, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct StatusResult {
    pub label: StatusLabel,
    pub tier: StatusTier,
}

impl StatusResult {
    /// The "-" result used whenever a value is missing
    pub const UNKNOWN: StatusResult = StatusResult {
        label: StatusLabel::Unknown,
        tier: StatusTier::None,
    };

    pub fn is_unknown(&self) -> bool {
        self.label == StatusLabel::Unknown
    }
}

impl From<StatusLabel> for StatusResult {
    fn from(label: StatusLabel) -> Self {
        StatusResult {
            label,
            tier: label.tier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serializes_as_display_text() {
        let json = serde_json::to_string(&StatusLabel::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");

        let json = serde_json::to_string(&StatusLabel::Unknown).unwrap();
        assert_eq!(json, "\"-\"");
    }

    #[test]
    fn test_tiers_are_ordered_by_severity() {
        assert!(StatusLabel::VeryLow.tier() > StatusLabel::Low.tier());
        assert!(StatusLabel::Low.tier() > StatusLabel::Good.tier());
        assert_eq!(StatusLabel::High.tier(), StatusLabel::Low.tier());
        assert_eq!(StatusResult::from(StatusLabel::Unknown), StatusResult::UNKNOWN);
    }
}
