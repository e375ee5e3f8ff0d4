//! Dashboard metrics derived from the canonical record list.
//!
//! Everything here is a pure function of `&[AttendanceRecord]`: the same
//! input always yields the same output, and empty input yields zeroed
//! output rather than an error.

mod daily;
mod departments;
mod employee;
mod insights;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::AttendanceRecord;

pub use daily::{DailyAttendance, daily_series};
pub use departments::{DEPARTMENT_COLORS, DepartmentShare, department_series};
pub use employee::{EmployeeSummary, employee_summary, filter_records};
pub use insights::{AttendanceQuality, DataCompleteness, Insights, PunctualityRating, insights};

/// Roster entry meaning "no employee filter".
pub const ALL_EMPLOYEES: &str = "All Employees";

/// Headline numbers for the whole record list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_employees: usize,
    pub total_records: usize,
    pub total_sign_ins: usize,
    pub total_sign_outs: usize,
    pub sign_in_percentage: f64,
    pub sign_out_percentage: f64,
    pub total_extra_hours: f64,
    pub average_extra_hours: f64,
    pub total_worked_hours: f64,
    /// Latest date present in the data, which stands in for "today".
    pub today: Option<NaiveDate>,
    pub present_today: usize,
    pub late_today: usize,
    pub absent_today: usize,
}

/// Everything the dashboard shows, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub roster: Vec<String>,
    pub stats: SummaryStats,
    pub daily: Vec<DailyAttendance>,
    pub departments: Vec<DepartmentShare>,
}

impl Default for Aggregate {
    fn default() -> Self {
        aggregate(&[])
    }
}

/// Derive roster, stats and both series from the records.
pub fn aggregate(records: &[AttendanceRecord]) -> Aggregate {
    Aggregate {
        roster: roster(records),
        stats: summary_stats(records),
        daily: daily_series(records),
        departments: department_series(records),
    }
}

fn distinct_employees(records: &[AttendanceRecord]) -> BTreeSet<&str> {
    records.iter().map(|r| r.employee_name.as_str()).collect()
}

/// Sorted distinct employee names, led by [`ALL_EMPLOYEES`].
///
/// Names are ordered by UTF-8 bytes, which matches UTF-16 code-unit order
/// except for characters outside the Basic Multilingual Plane.
pub fn roster(records: &[AttendanceRecord]) -> Vec<String> {
    std::iter::once(ALL_EMPLOYEES.to_string())
        .chain(distinct_employees(records).into_iter().map(str::to_string))
        .collect()
}

/// `part / whole * 100`, or zero for an empty whole.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Compute the headline numbers.
pub fn summary_stats(records: &[AttendanceRecord]) -> SummaryStats {
    let total_records = records.len();
    let total_employees = distinct_employees(records).len();
    let total_sign_ins = records.iter().filter(|r| r.has_sign_in).count();
    let total_sign_outs = records.iter().filter(|r| r.has_sign_out).count();
    let total_extra_hours: f64 = records.iter().map(|r| r.extra_hours).sum();
    let total_worked_hours: f64 = records.iter().map(|r| r.worked_hours).sum();

    let today = records.iter().map(|r| r.date).max();
    let todays = || records.iter().filter(move |r| Some(r.date) == today);
    let present_today = todays().filter(|r| r.present).count();
    let late_today = todays().filter(|r| r.late).count();

    SummaryStats {
        total_employees,
        total_records,
        total_sign_ins,
        total_sign_outs,
        sign_in_percentage: percentage(total_sign_ins, total_records),
        sign_out_percentage: percentage(total_sign_outs, total_records),
        total_extra_hours,
        average_extra_hours: if total_records == 0 {
            0.0
        } else {
            total_extra_hours / total_records as f64
        },
        total_worked_hours,
        today,
        present_today,
        late_today,
        absent_today: total_employees.saturating_sub(present_today),
    }
}
