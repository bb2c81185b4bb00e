//! Threshold classification of individual vital-sign values.
//!
//! Every function is total: a missing or zero value yields the "-" result
//! instead of an error.

use crate::entities::reading::{present, ClassifiedReading, Reading};
use crate::entities::report::ThresholdGuideRow;
use crate::entities::status::{StatusLabel, StatusResult};

/// Classify a blood pressure pair.
///
/// Bands are checked in order Very High, High, Low, Good and the first match
/// wins, so a reading with one value in a high band is never reported Low.
pub fn classify_blood_pressure(systolic: Option<u16>, diastolic: Option<u16>) -> StatusResult {
    let (Some(sys), Some(dia)) = (present(systolic), present(diastolic)) else {
        return StatusResult::UNKNOWN;
    };

    let label = if sys >= 180 || dia >= 120 {
        StatusLabel::VeryHigh
    } else if sys >= 140 || dia >= 90 {
        StatusLabel::High
    } else if sys <= 90 || dia <= 60 {
        StatusLabel::Low
    } else {
        StatusLabel::Good
    };

    label.into()
}

/// Classify a pulse rate in beats per minute.
///
/// The comparisons are strict: 100 and 120 are not High/Very High, 60 and 40
/// are not Low/Very Low.
pub fn classify_pulse(pulse: Option<u16>) -> StatusResult {
    let Some(pulse) = present(pulse) else {
        return StatusResult::UNKNOWN;
    };

    let label = if pulse > 120 {
        StatusLabel::VeryHigh
    } else if pulse > 100 {
        StatusLabel::High
    } else if pulse < 40 {
        StatusLabel::VeryLow
    } else if pulse < 60 {
        StatusLabel::Low
    } else {
        StatusLabel::Good
    };

    label.into()
}

/// Classify blood oxygen saturation in percent. There is no High band.
pub fn classify_oxygen(oxygen: Option<u16>) -> StatusResult {
    let Some(oxygen) = present(oxygen) else {
        return StatusResult::UNKNOWN;
    };

    let label = if oxygen >= 95 {
        StatusLabel::Good
    } else if oxygen >= 91 {
        StatusLabel::Low
    } else {
        StatusLabel::VeryLow
    };

    label.into()
}

/// Attach the status of each vital sign to a reading
pub fn classify_reading(reading: Reading) -> ClassifiedReading {
    ClassifiedReading {
        blood_pressure_status: classify_blood_pressure(reading.systolic, reading.diastolic),
        pulse_status: classify_pulse(reading.pulse),
        oxygen_status: classify_oxygen(reading.oxygen),
        reading,
    }
}

/// Human-readable summary of the bands above, most severe first
pub fn thresholds_guide() -> Vec<ThresholdGuideRow> {
    let row = |label: StatusLabel, bp: &str, pulse: &str, oxygen: &str| ThresholdGuideRow {
        status: label.into(),
        blood_pressure: bp.to_string(),
        pulse: pulse.to_string(),
        oxygen: oxygen.to_string(),
    };

    vec![
        row(StatusLabel::VeryHigh, "180+ / 120+", "120+ bpm", "-"),
        row(StatusLabel::High, "140-179 / 90-119", "101-120 bpm", "-"),
        row(StatusLabel::Good, "91-139 / 61-89", "60-100 bpm", "95-100%"),
        row(StatusLabel::Low, "90 or less / 60 or less", "40-59 bpm", "91-94%"),
        row(StatusLabel::VeryLow, "-", "Below 40 bpm", "90% or less"),
    ]
}
