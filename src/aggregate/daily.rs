//! Per-day time series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::AttendanceRecord;

/// One point of the daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub date: NaiveDate,
    /// `Day N`, 1-based in date order.
    pub label: String,
    pub sign_ins: usize,
    pub sign_outs: usize,
    pub present: usize,
    pub late: usize,
    pub extra_hours: f64,
    pub worked_hours: f64,
    pub unique_employees: usize,
}

/// Running totals for one date.
#[derive(Debug, Default)]
struct DailyBucket<'a> {
    sign_ins: usize,
    sign_outs: usize,
    present: usize,
    late: usize,
    extra_hours: f64,
    worked_hours: f64,
    employees: BTreeSet<&'a str>,
}

impl<'a> DailyBucket<'a> {
    fn add(&mut self, record: &'a AttendanceRecord) {
        self.sign_ins += usize::from(record.has_sign_in);
        self.sign_outs += usize::from(record.has_sign_out);
        self.present += usize::from(record.present);
        self.late += usize::from(record.late);
        self.extra_hours += record.extra_hours;
        self.worked_hours += record.worked_hours;
        self.employees.insert(&record.employee_name);
    }
}

/// Bucket records by date, ascending.
pub fn daily_series(records: &[AttendanceRecord]) -> Vec<DailyAttendance> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket<'_>> = BTreeMap::new();
    for record in records {
        buckets.entry(record.date).or_default().add(record);
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(index, (date, bucket))| DailyAttendance {
            date,
            label: format!("Day {}", index + 1),
            sign_ins: bucket.sign_ins,
            sign_outs: bucket.sign_outs,
            present: bucket.present,
            late: bucket.late,
            extra_hours: bucket.extra_hours,
            worked_hours: bucket.worked_hours,
            unique_employees: bucket.employees.len(),
        })
        .collect()
}
