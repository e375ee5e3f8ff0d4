//! Employee filter and per-employee summary.

use serde::Serialize;

use super::ALL_EMPLOYEES;
use crate::models::AttendanceRecord;

/// Records matching a roster selection; the sentinel selects everything.
pub fn filter_records<'a>(records: &'a [AttendanceRecord], selection: &str) -> Vec<&'a AttendanceRecord> {
    records
        .iter()
        .filter(|r| selection == ALL_EMPLOYEES || r.employee_name == selection)
        .collect()
}

/// Totals for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub employee: String,
    /// Department of the employee's first record.
    pub department: String,
    pub days_recorded: usize,
    pub sign_ins: usize,
    pub sign_outs: usize,
    pub total_extra_hours: f64,
    pub total_worked_hours: f64,
    pub late_count: usize,
}

/// Summary for a named employee; `None` for the sentinel or an unknown name.
pub fn employee_summary(records: &[AttendanceRecord], employee: &str) -> Option<EmployeeSummary> {
    if employee == ALL_EMPLOYEES {
        return None;
    }
    let own: Vec<&AttendanceRecord> = records.iter().filter(|r| r.employee_name == employee).collect();
    let first = own.first()?;

    Some(EmployeeSummary {
        employee: employee.to_string(),
        department: first.department.clone(),
        days_recorded: own.len(),
        sign_ins: own.iter().filter(|r| r.has_sign_in).count(),
        sign_outs: own.iter().filter(|r| r.has_sign_out).count(),
        total_extra_hours: own.iter().map(|r| r.extra_hours).sum(),
        total_worked_hours: own.iter().map(|r| r.worked_hours).sum(),
        late_count: own.iter().filter(|r| r.late).count(),
    })
}
