//! Row-by-row construction of canonical attendance records.

use chrono::NaiveTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::PipelineOptions;
use super::cell::CellInterpreter;
use super::columns::ColumnMap;
use super::department::resolve_department;
use crate::error::{AppError, Result};
use crate::models::{AttendanceRecord, CellValue, ParsedTimestamp, RawSheet};

/// Why a data row produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Every cell is empty or whitespace.
    EmptyRow,
    /// Name cell is blank after trimming.
    MissingName,
    /// Sign-in cell is absent or could not be interpreted.
    MissingSignIn { employee: String },
}

/// A rejected data row, numbered as in the sheet (header is row 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Output of a build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Accepted records, in sheet order.
    pub records: Vec<AttendanceRecord>,
    pub skipped: Vec<SkippedRow>,
    /// Data rows examined, blank ones included.
    pub total_rows: usize,
}

impl BuildReport {
    /// Rows rejected for a reason other than being blank.
    pub fn rejected_count(&self) -> usize {
        self.skipped.iter().filter(|s| s.reason != SkipReason::EmptyRow).count()
    }
}

/// Applies a [`ColumnMap`] to data rows.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    columns: ColumnMap,
    interpreter: CellInterpreter,
    late_after: NaiveTime,
}

impl RecordBuilder {
    pub fn new(columns: ColumnMap, options: &PipelineOptions) -> Self {
        Self {
            columns,
            interpreter: CellInterpreter::new(options.zone),
            late_after: options.late_after,
        }
    }

    /// Build records for every data row of the sheet.
    ///
    /// Fails with [`AppError::NoValidRecords`] when no row is accepted.
    pub fn build(&self, sheet: &RawSheet) -> Result<BuildReport> {
        let mut report = BuildReport {
            total_rows: sheet.data_row_count(),
            ..Default::default()
        };

        for (offset, row) in sheet.data_rows().iter().enumerate() {
            let row_number = offset + 1;
            match self.build_row(row) {
                Ok(record) => {
                    debug!("Row {row_number}: record for {} on {}", record.employee_name, record.date);
                    report.records.push(record);
                }
                Err(reason) => {
                    debug!("Row {row_number}: skipped ({reason:?})");
                    report.skipped.push(SkippedRow {
                        row: row_number,
                        reason,
                    });
                }
            }
        }

        info!(
            "Built {} attendance records from {} rows ({} rejected)",
            report.records.len(),
            report.total_rows,
            report.rejected_count()
        );

        if report.records.is_empty() {
            return Err(AppError::NoValidRecords {
                rows: report.total_rows,
            });
        }

        Ok(report)
    }

    /// Accept or reject a single data row.
    pub fn build_row(&self, row: &[CellValue]) -> std::result::Result<AttendanceRecord, SkipReason> {
        if row.iter().all(CellValue::is_blank) {
            return Err(SkipReason::EmptyRow);
        }

        let employee_name = self.text(row, self.columns.name).trim().to_string();
        if employee_name.is_empty() {
            return Err(SkipReason::MissingName);
        }

        let sign_in = self.timestamp(row, self.columns.sign_in, "sign-in");
        let sign_out = self.timestamp(row, self.columns.sign_out, "sign-out");

        let Some(sign_in) = sign_in else {
            return Err(SkipReason::MissingSignIn {
                employee: employee_name,
            });
        };

        let extra_hours = self.hours(row, self.columns.extra_hours);
        let total_hours = self.hours(row, self.columns.total_hours);
        let worked_hours = worked_hours(&sign_in, sign_out.as_ref(), total_hours);

        let department = resolve_department(&self.text(row, self.columns.department), &employee_name);

        Ok(AttendanceRecord {
            date: sign_in.date,
            sign_in_time: Some(sign_in.time),
            sign_out_time: sign_out.map(|t| t.time),
            extra_hours,
            worked_hours,
            department,
            present: true,
            late: sign_in.time > self.late_after,
            has_sign_in: true,
            has_sign_out: sign_out.is_some(),
            employee_name,
        })
    }

    fn cell<'a>(&self, row: &'a [CellValue], column: Option<usize>) -> Option<&'a CellValue> {
        column.and_then(|index| row.get(index))
    }

    fn text(&self, row: &[CellValue], column: Option<usize>) -> String {
        self.cell(row, column).map(CellValue::as_text).unwrap_or_default()
    }

    fn timestamp(&self, row: &[CellValue], column: Option<usize>, label: &str) -> Option<ParsedTimestamp> {
        let cell = self.cell(row, column)?;
        let parsed = self.interpreter.interpret(cell);
        if parsed.is_none() && !cell.is_blank() {
            warn!("Invalid {label} date/time: {}", cell.as_text());
        }
        parsed
    }

    fn hours(&self, row: &[CellValue], column: Option<usize>) -> f64 {
        self.cell(row, column).map(parse_hours).unwrap_or(0.0)
    }
}

/// Recompute hours from the timestamps when both fall on the same date and
/// sign-out is later; otherwise keep the provided figure.
pub fn worked_hours(sign_in: &ParsedTimestamp, sign_out: Option<&ParsedTimestamp>, provided: f64) -> f64 {
    match sign_out {
        Some(out) if out.date == sign_in.date && out.time > sign_in.time => {
            (out.time - sign_in.time).num_minutes() as f64 / 60.0
        }
        _ => provided,
    }
}

/// Read an hours cell; anything non-numeric or negative counts as zero.
pub fn parse_hours(cell: &CellValue) -> f64 {
    let value = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_leading_float(s),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(v) => {
            warn!("Ignoring out-of-range hours value: {v}");
            0.0
        }
        None => 0.0,
    }
}

/// Parse the longest numeric prefix of `text`, e.g. `"2.5h"` gives `2.5`.
fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
