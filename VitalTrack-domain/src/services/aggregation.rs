//! Time-windowed aggregation of readings.
//!
//! Windows have an inclusive lower bound and no upper bound: a reading dated
//! after the caller's "now" (clock skew, manual entry) still counts. The
//! caller always supplies "now"; nothing here reads a clock.

use chrono::{Duration, NaiveDateTime};

use crate::entities::aggregate::{
    AggregateWindow, DashboardSummary, Metric, MetricValue, WindowAverages,
};
use crate::entities::reading::{present, MeasurementSet, Reading};
use crate::entities::status::StatusResult;
use crate::services::classifier::{
    classify_blood_pressure, classify_oxygen, classify_pulse, classify_reading,
};

/// Length of the dashboard's recent-readings window
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Length of the dashboard's rolling-average window
pub const AVERAGE_WINDOW_DAYS: i64 = 7;

/// Start of the trailing 24 hour window ending at `now`
pub fn recent_window_start(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::hours(RECENT_WINDOW_HOURS)
}

/// Start of the trailing 7 day window ending at `now`
pub fn average_window_start(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(AVERAGE_WINDOW_DAYS)
}

/// Whether a reading falls inside a window starting at `window_start`.
/// Readings whose date or time does not parse never qualify.
pub fn in_window(reading: &Reading, window_start: NaiveDateTime) -> bool {
    reading
        .timestamp()
        .map_or(false, |timestamp| timestamp >= window_start)
}

/// Readings at or after `window_start`, in the order given
pub fn readings_since(readings: &[Reading], window_start: NaiveDateTime) -> Vec<Reading> {
    readings
        .iter()
        .filter(|reading| in_window(reading, window_start))
        .cloned()
        .collect()
}

/// Running sum for an integer mean
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: u64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: u16) {
        self.sum += u64::from(value);
        self.count += 1;
    }

    /// Mean rounded half-up; `None` when nothing was pushed
    fn mean(&self) -> Option<u16> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as u64;
        let rounded = (2 * self.sum + count) / (2 * count);
        // A mean never exceeds the largest u16 pushed
        Some(rounded as u16)
    }
}

/// Counts, rounded means and statuses per metric over one window.
///
/// Blood pressure only counts readings with both systolic and diastolic
/// recorded; zero values count as not recorded.
pub fn compute_window_averages(
    readings: &[Reading],
    window_start: NaiveDateTime,
    now: NaiveDateTime,
) -> WindowAverages {
    let mut systolic = MeanAccumulator::default();
    let mut diastolic = MeanAccumulator::default();
    let mut pulse = MeanAccumulator::default();
    let mut oxygen = MeanAccumulator::default();

    for reading in readings.iter().filter(|r| in_window(r, window_start)) {
        if let Some((sys, dia)) = reading.blood_pressure() {
            systolic.push(sys);
            diastolic.push(dia);
        }
        if let Some(value) = reading.pulse_value() {
            pulse.push(value);
        }
        if let Some(value) = reading.oxygen_value() {
            oxygen.push(value);
        }
    }

    let blood_pressure = match (systolic.mean(), diastolic.mean()) {
        (Some(sys), Some(dia)) => AggregateWindow {
            metric: Metric::BloodPressure,
            count: systolic.count,
            mean: Some(MetricValue::BloodPressure { systolic: sys, diastolic: dia }),
            status: classify_blood_pressure(Some(sys), Some(dia)),
        },
        _ => AggregateWindow::empty(Metric::BloodPressure),
    };

    WindowAverages {
        blood_pressure,
        pulse: single_metric(Metric::Pulse, &pulse, classify_pulse),
        oxygen: single_metric(Metric::Oxygen, &oxygen, classify_oxygen),
        window_start,
        generated_at: now,
    }
}

fn single_metric(
    metric: Metric,
    accumulator: &MeanAccumulator,
    classify: fn(Option<u16>) -> StatusResult,
) -> AggregateWindow {
    match accumulator.mean() {
        Some(mean) => AggregateWindow {
            metric,
            count: accumulator.count,
            mean: Some(MetricValue::Single(mean)),
            status: classify(Some(mean)),
        },
        None => AggregateWindow::empty(metric),
    }
}

/// Recent readings (classified, in the order given) plus the rolling averages
pub fn build_dashboard(readings: &[Reading], now: NaiveDateTime) -> DashboardSummary {
    let recent = readings_since(readings, recent_window_start(now))
        .into_iter()
        .map(classify_reading)
        .collect();

    DashboardSummary {
        recent,
        averages: compute_window_averages(readings, average_window_start(now), now),
    }
}

/// Average several takes of one measurement session field by field.
/// Absent or zero entries are skipped; a field with no values stays absent.
pub fn average_measurements(takes: &[MeasurementSet]) -> MeasurementSet {
    let mut systolic = MeanAccumulator::default();
    let mut diastolic = MeanAccumulator::default();
    let mut pulse = MeanAccumulator::default();

    for take in takes {
        if let Some(value) = present(take.systolic) {
            systolic.push(value);
        }
        if let Some(value) = present(take.diastolic) {
            diastolic.push(value);
        }
        if let Some(value) = present(take.pulse) {
            pulse.push(value);
        }
    }

    MeasurementSet {
        systolic: systolic.mean(),
        diastolic: diastolic.mean(),
        pulse: pulse.mean(),
    }
}
