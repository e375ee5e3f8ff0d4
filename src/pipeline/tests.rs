//! End-to-end normalization tests.

use chrono::{NaiveDate, NaiveTime};

use super::*;
use crate::error::AppError;
use crate::models::{CellValue, RawSheet};

fn utc_options() -> PipelineOptions {
    PipelineOptions::with_zone(ZoneSetting::Named(chrono_tz::UTC))
}

fn row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

fn sheet(rows: Vec<Vec<CellValue>>) -> RawSheet {
    RawSheet::new(rows).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_reference_row() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In", "Check Out", "Extra Hours"]),
        row(&["Jane Doe", "2024-01-01 09:30:00", "2024-01-01 18:00:00", "2"]),
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.employee_name, "Jane Doe");
    assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(record.sign_in_time, Some(hm(9, 30)));
    assert_eq!(record.sign_out_time, Some(hm(18, 0)));
    assert_eq!(record.extra_hours, 2.0);
    assert_eq!(record.worked_hours, 8.5);
    assert!(!record.late);
    assert!(record.present);
    assert!(record.has_sign_in);
    assert!(record.has_sign_out);
    assert_eq!(record.department, "General");
}

#[test]
fn test_serial_sign_in() {
    let sheet = sheet(vec![
        row(&["Name", "Sign In"]),
        vec![CellValue::from("Ann"), CellValue::Number(45000.0)],
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();
    assert_eq!(report.records[0].date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
}

#[test]
fn test_lateness_boundary() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In"]),
        row(&["A", "2024-01-01 10:01:00"]),
        row(&["B", "2024-01-01 10:00:00"]),
        row(&["C", "2024-01-01 09:59:00"]),
        row(&["D", "2024-01-01 10:00:59"]),
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();
    let late: Vec<bool> = report.records.iter().map(|r| r.late).collect();
    // seconds are truncated before the comparison
    assert_eq!(late, vec![true, false, false, false]);
}

#[test]
fn test_configured_late_threshold() {
    let options = PipelineOptions {
        late_after: hm(9, 0),
        ..utc_options()
    };
    let sheet = sheet(vec![row(&["Employee", "Check In"]), row(&["A", "2024-01-01 09:01:00"])]);
    let report = normalize(&sheet, &options).unwrap();
    assert!(report.records[0].late);
}

#[test]
fn test_worked_hours_kept_when_not_recomputable() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In", "Check Out", "Worked Hours"]),
        // sign-out on a later date
        row(&["Night", "2024-01-01 22:00:00", "2024-01-02 06:00:00", "8"]),
        // sign-out before sign-in
        row(&["Odd", "2024-01-01 12:00:00", "2024-01-01 08:00:00", "3.5"]),
        // sign-out equal to sign-in
        row(&["Same", "2024-01-01 09:00:00", "2024-01-01 09:00:30", ""]),
        // no sign-out at all
        row(&["Open", "2024-01-01 09:00:00", "", "7"]),
        // recomputed, provided value ignored
        row(&["Day", "2024-01-01 08:15:00", "2024-01-01 17:45:00", "1"]),
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();
    let hours: Vec<f64> = report.records.iter().map(|r| r.worked_hours).collect();
    assert_eq!(hours, vec![8.0, 3.5, 0.0, 7.0, 9.5]);
    assert!(!report.records[3].has_sign_out);
    assert_eq!(report.records[3].sign_out_time, None);
}

#[test]
fn test_skip_reasons() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In", "Check Out"]),
        row(&["", "", ""]),
        row(&["  ", "2024-01-01 09:00:00", ""]),
        row(&["Bob", "garbage", "2024-01-01 17:00:00"]),
        row(&["  Carol  ", "2024-01-01 08:00:00", ""]),
        Vec::new(),
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();

    assert_eq!(report.total_rows, 5);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].employee_name, "Carol");
    assert_eq!(
        report.skipped,
        vec![
            SkippedRow {
                row: 1,
                reason: SkipReason::EmptyRow
            },
            SkippedRow {
                row: 2,
                reason: SkipReason::MissingName
            },
            SkippedRow {
                row: 3,
                reason: SkipReason::MissingSignIn {
                    employee: "Bob".to_string()
                }
            },
            SkippedRow {
                row: 5,
                reason: SkipReason::EmptyRow
            },
        ]
    );
    // blank rows are not rejections
    assert_eq!(report.rejected_count(), 2);
}

#[test]
fn test_record_iff_name_and_sign_in() {
    let options = utc_options();
    let columns = classify(&["Employee", "Check In"]).unwrap();
    let builder = RecordBuilder::new(columns, &options);
    let names = ["", " ", "Ann"];
    let sign_ins = ["", "nope", "2024-01-01 09:00:00"];

    for name in names {
        for sign_in in sign_ins {
            let result = builder.build_row(&row(&[name, sign_in]));
            let expected = !name.trim().is_empty() && sign_in.starts_with("2024");
            assert_eq!(result.is_ok(), expected, "name={name:?} sign_in={sign_in:?}");
            if let Ok(record) = result {
                assert_eq!(record.employee_name, record.employee_name.trim());
                assert!(!record.employee_name.is_empty());
            }
        }
    }
}

#[test]
fn test_short_rows_and_missing_optional_columns() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In", "Check Out", "Extra Hours", "Department"]),
        row(&["Dev Lee", "2024-01-01 09:00:00"]),
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();
    let record = &report.records[0];
    assert_eq!(record.extra_hours, 0.0);
    assert_eq!(record.department, "IT");
    assert!(!record.has_sign_out);
}

#[test]
fn test_provided_department_and_numeric_hours() {
    let sheet = sheet(vec![
        row(&["Staff", "Time In", "Time Out", "Overtime", "Total Hours", "Dept"]),
        vec![
            CellValue::from("Sam"),
            CellValue::from("2024-02-01T08:00:00"),
            CellValue::from("2024-02-01T16:30:00"),
            CellValue::Number(1.5),
            CellValue::Number(8.0),
            CellValue::from(" Finance "),
        ],
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();
    let record = &report.records[0];
    assert_eq!(record.extra_hours, 1.5);
    assert_eq!(record.worked_hours, 8.5);
    assert_eq!(record.department, "Finance");
}

#[test]
fn test_row_order_preserved() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In"]),
        row(&["Zed", "2024-01-03 09:00:00"]),
        row(&["Amy", "2024-01-01 09:00:00"]),
        row(&["Max", "2024-01-02 09:00:00"]),
    ]);
    let report = normalize(&sheet, &utc_options()).unwrap();
    let names: Vec<&str> = report.records.iter().map(|r| r.employee_name.as_str()).collect();
    assert_eq!(names, vec!["Zed", "Amy", "Max"]);
}

#[test]
fn test_no_valid_records() {
    let sheet = sheet(vec![
        row(&["Employee", "Check In"]),
        row(&["Ann", "not a time"]),
        row(&["", "2024-01-01 09:00:00"]),
    ]);
    let result = normalize(&sheet, &utc_options());
    assert!(matches!(result, Err(AppError::NoValidRecords { rows: 2 })));
}

#[test]
fn test_missing_sign_in_column() {
    let sheet = sheet(vec![row(&["Employee", "Department"]), row(&["Ann", "HR"])]);
    let result = normalize(&sheet, &utc_options());
    assert!(matches!(
        result,
        Err(AppError::MissingColumn {
            role: ColumnRole::SignIn
        })
    ));
}

#[test]
fn test_header_only_fails_before_classification() {
    // a header with no recognizable roles still reports the workbook problem first
    let result = RawSheet::new(vec![row(&["foo", "bar"])]);
    assert!(matches!(result, Err(AppError::MalformedWorkbook(_))));
}
