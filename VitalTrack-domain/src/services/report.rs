//! Report and CSV export builders.
//!
//! Both work on a snapshot of readings handed in by the caller and never touch
//! the store.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use crate::entities::aggregate::Metric;
use crate::entities::reading::{present, Reading};
use crate::entities::report::{ChartPoint, Report, ReportCell, ReportOptions, ReportRow, SortOrder};
use crate::services::classifier::{
    classify_blood_pressure, classify_oxygen, classify_pulse, thresholds_guide,
};
use crate::services::history::{filter_by_date_range, sort_readings};

/// Report and export errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Please select at least one data type to include")]
    NoMetricsSelected,

    #[error("No data found for selected period")]
    NoData,

    #[error("No data to export")]
    NothingToExport,

    #[error("Failed to write CSV: {0}")]
    Csv(String),
}

/// CSV header row
pub const CSV_HEADER: &str = "Date,Time,Period,Systolic,Diastolic,Pulse,Oxygen,Notes";

/// Render `YYYY-MM-DD` as `DD/MM/YYYY`; anything else is returned unchanged
pub fn format_display_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => date.to_string(),
    }
}

fn report_cell(reading: &Reading, metric: Metric) -> ReportCell {
    let (value, status) = match metric {
        Metric::BloodPressure => (
            reading
                .blood_pressure()
                .map(|(sys, dia)| format!("{}/{}", sys, dia)),
            classify_blood_pressure(reading.systolic, reading.diastolic),
        ),
        Metric::Pulse => (
            reading.pulse_value().map(|pulse| pulse.to_string()),
            classify_pulse(reading.pulse),
        ),
        Metric::Oxygen => (
            reading.oxygen_value().map(|oxygen| format!("{}%", oxygen)),
            classify_oxygen(reading.oxygen),
        ),
    };

    ReportCell { metric, value, status }
}

fn chart_point(reading: &Reading, metrics: &[Metric]) -> ChartPoint {
    let selected = |metric: Metric, value: Option<u16>| {
        if metrics.contains(&metric) {
            present(value)
        } else {
            None
        }
    };

    ChartPoint {
        label: format_display_date(&reading.date),
        systolic: selected(Metric::BloodPressure, reading.systolic),
        diastolic: selected(Metric::BloodPressure, reading.diastolic),
        pulse: selected(Metric::Pulse, reading.pulse),
        oxygen: selected(Metric::Oxygen, reading.oxygen),
    }
}

/// Build the report table, chart series and thresholds guide.
///
/// Rows follow `options.sort`; the chart is always oldest first.
pub fn build_report(readings: &[Reading], options: &ReportOptions) -> Result<Report, ReportError> {
    let metrics = options.metrics();
    if metrics.is_empty() {
        return Err(ReportError::NoMetricsSelected);
    }

    let mut selected = filter_by_date_range(
        readings,
        options.start_date.as_deref(),
        options.end_date.as_deref(),
    );
    if selected.is_empty() {
        return Err(ReportError::NoData);
    }

    sort_readings(&mut selected, SortOrder::Asc);
    let chart = selected
        .iter()
        .map(|reading| chart_point(reading, &metrics))
        .collect();

    if options.sort == SortOrder::Desc {
        selected.reverse();
    }

    let rows = selected
        .iter()
        .map(|reading| ReportRow {
            id: reading.id,
            date: format_display_date(&reading.date),
            time: reading.time.clone(),
            cells: metrics.iter().map(|&m| report_cell(reading, m)).collect(),
            notes: reading.notes.clone(),
        })
        .collect();

    let mut columns = vec!["Date".to_string(), "Time".to_string()];
    columns.extend(metrics.iter().map(|m| m.title().to_string()));
    columns.push("Notes".to_string());

    Ok(Report {
        columns,
        rows,
        chart,
        thresholds: thresholds_guide(),
    })
}

/// Prefix text a spreadsheet would evaluate as a formula
fn neutralise_formula(text: &str) -> String {
    if text.starts_with(['=', '+', '-', '@']) {
        format!("'{}", text)
    } else {
        text.to_string()
    }
}

fn text_field(value: Option<&str>) -> String {
    neutralise_formula(value.unwrap_or_default())
}

fn number_field(value: Option<u16>) -> String {
    present(value).map(|v| v.to_string()).unwrap_or_default()
}

fn csv_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Csv(err.to_string())
}

/// Render readings as CSV in the order given, one row per reading.
///
/// Fields are quoted only when they contain a delimiter, quote or line break.
pub fn export_csv(readings: &[Reading]) -> Result<String, ReportError> {
    if readings.is_empty() {
        return Err(ReportError::NothingToExport);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(64 * (readings.len() + 1)));

    writer.write_record(CSV_HEADER.split(',')).map_err(csv_error)?;

    for reading in readings {
        writer
            .write_record([
                format_display_date(&reading.date),
                neutralise_formula(&reading.time),
                text_field(reading.period.as_deref()),
                number_field(reading.systolic),
                number_field(reading.diastolic),
                number_field(reading.pulse),
                number_field(reading.oxygen),
                text_field(reading.notes.as_deref()),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

/// Download name for an export made on `date`
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("VitalTrack_Data_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::status::StatusLabel;

    fn reading(id: i64, date: &str, time: &str) -> Reading {
        Reading {
            id,
            date: date.to_string(),
            time: time.to_string(),
            period: None,
            systolic: Some(120),
            diastolic: Some(80),
            pulse: Some(72),
            oxygen: Some(97),
            notes: None,
        }
    }

    fn readings() -> Vec<Reading> {
        // Store order: newest first
        vec![
            reading(3, "2024-03-10", "08:00"),
            Reading {
                systolic: Some(150),
                diastolic: Some(95),
                oxygen: None,
                notes: Some("after coffee".to_string()),
                ..reading(2, "2024-03-05", "19:30")
            },
            reading(1, "2024-02-28", "07:45"),
        ]
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("2024-01-05"), "05/01/2024");
        assert_eq!(format_display_date("05/01/2024"), "05/01/2024");
        assert_eq!(format_display_date(""), "");
        assert_eq!(format_display_date("2024-01"), "2024-01");
    }

    #[test]
    fn test_report_requires_a_metric() {
        let options = ReportOptions {
            include_blood_pressure: false,
            include_pulse: false,
            include_oxygen: false,
            ..ReportOptions::default()
        };

        assert_eq!(build_report(&readings(), &options), Err(ReportError::NoMetricsSelected));
    }

    #[test]
    fn test_report_with_no_data_in_period() {
        let options = ReportOptions {
            start_date: Some("2025-01-01".to_string()),
            ..ReportOptions::default()
        };

        assert_eq!(build_report(&readings(), &options), Err(ReportError::NoData));
        assert_eq!(build_report(&[], &ReportOptions::default()), Err(ReportError::NoData));
    }

    #[test]
    fn test_report_columns_follow_selection() {
        let options = ReportOptions {
            include_pulse: false,
            ..ReportOptions::default()
        };

        let report = build_report(&readings(), &options).unwrap();

        assert_eq!(report.columns, vec!["Date", "Time", "Blood Pressure", "Oxygen", "Notes"]);
        assert!(report.rows.iter().all(|row| row.cells.len() == 2));
        assert!(report.chart.iter().all(|point| point.pulse.is_none()));
        assert_eq!(report.thresholds.len(), 5);
    }

    #[test]
    fn test_report_rows_and_chart_order() {
        let options = ReportOptions {
            start_date: Some("2024-03-01".to_string()),
            sort: SortOrder::Desc,
            ..ReportOptions::default()
        };

        let report = build_report(&readings(), &options).unwrap();

        let row_ids: Vec<i64> = report.rows.iter().map(|row| row.id).collect();
        assert_eq!(row_ids, vec![3, 2]);

        let labels: Vec<&str> = report.chart.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["05/03/2024", "10/03/2024"]);
    }

    #[test]
    fn test_report_cells() {
        let report = build_report(&readings(), &ReportOptions::default()).unwrap();
        let row = report.rows.iter().find(|row| row.id == 2).unwrap();

        assert_eq!(row.date, "05/03/2024");
        assert_eq!(row.time, "19:30");
        assert_eq!(row.notes.as_deref(), Some("after coffee"));

        let bp = &row.cells[0];
        assert_eq!(bp.metric, Metric::BloodPressure);
        assert_eq!(bp.value.as_deref(), Some("150/95"));
        assert_eq!(bp.status.label, StatusLabel::High);

        assert_eq!(row.cells[1].value.as_deref(), Some("72"));

        let oxygen = &row.cells[2];
        assert_eq!(oxygen.value, None);
        assert!(oxygen.status.is_unknown());

        let first = report.rows.iter().find(|row| row.id == 1).unwrap();
        assert_eq!(first.cells[2].value.as_deref(), Some("97%"));
    }

    #[test]
    fn test_export_csv() {
        let mut readings = readings();
        readings[0].period = Some("Morning".to_string());
        readings[0].pulse = Some(0);

        let csv = export_csv(&readings).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "10/03/2024,08:00,Morning,120,80,,97,");
        assert_eq!(lines[2], "05/03/2024,19:30,,150,95,72,,after coffee");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_csv_escapes_notes() {
        let mut reading = reading(1, "2024-01-01", "09:00");
        reading.notes = Some("=HYPERLINK(\"x\")".to_string());
        reading.period = Some("Late, evening".to_string());

        let csv = export_csv(&[reading]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.contains("\"Late, evening\""));
        assert!(row.ends_with("\"'=HYPERLINK(\"\"x\"\")\""));
    }

    #[test]
    fn test_export_csv_reads_back_multiline_notes() {
        let mut reading = reading(1, "2024-01-01", "09:00");
        reading.notes = Some("dizzy\nsat down, felt better".to_string());
        reading.period = Some("-late".to_string());

        let csv = export_csv(&[reading]).unwrap();

        let mut parsed = csv::Reader::from_reader(csv.as_bytes());
        let headers = parsed.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>().join(","), CSV_HEADER);

        let records: Vec<csv::StringRecord> = parsed.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][2], "'-late");
        assert_eq!(&records[0][7], "dizzy\nsat down, felt better");
    }

    #[test]
    fn test_export_nothing() {
        assert_eq!(export_csv(&[]), Err(ReportError::NothingToExport));
    }

    #[test]
    fn test_csv_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(csv_file_name(date), "VitalTrack_Data_2024-06-01.csv");
    }
}
