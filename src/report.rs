//! Plain-text and JSON rendering of a loaded dashboard.

use std::fmt::Write;

use serde::Serialize;

use crate::aggregate::{
    ALL_EMPLOYEES, DailyAttendance, EmployeeSummary, Insights, daily_series, employee_summary, filter_records, insights,
};
use crate::dashboard::DashboardState;
use crate::models::AttendanceRecord;

/// Everything the CLI prints for one dashboard and employee selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument<'a> {
    pub dashboard: &'a DashboardState,
    pub selection: String,
    /// Daily series restricted to the selection.
    pub selected_daily: Vec<DailyAttendance>,
    pub employee: Option<EmployeeSummary>,
    pub insights: Insights,
}

impl<'a> ReportDocument<'a> {
    /// `selection` of `None` means every employee.
    pub fn new(dashboard: &'a DashboardState, selection: Option<&str>) -> Self {
        let selection = selection.unwrap_or(ALL_EMPLOYEES).to_string();
        let selected: Vec<AttendanceRecord> = filter_records(&dashboard.records, &selection)
            .into_iter()
            .cloned()
            .collect();

        Self {
            dashboard,
            selected_daily: daily_series(&selected),
            employee: employee_summary(&dashboard.records, &selection),
            insights: insights(
                &dashboard.records,
                &dashboard.stats,
                &dashboard.daily,
                &dashboard.departments,
            ),
            selection,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as human-readable text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        let state = self.dashboard;
        let stats = &state.stats;

        writeln!(out, "Attendance Dashboard")?;
        if let Some(source) = &state.source {
            writeln!(out, "Source: {source}")?;
        }
        if let Some(loaded_at) = state.loaded_at {
            writeln!(out, "Loaded: {}", loaded_at.format("%Y-%m-%d %H:%M:%S"))?;
        }
        writeln!(out)?;

        writeln!(out, "== Summary ==")?;
        writeln!(out, "Employees:        {}", stats.total_employees)?;
        writeln!(out, "Records:          {}", stats.total_records)?;
        writeln!(out, "Sign-ins:         {} ({:.1}%)", stats.total_sign_ins, stats.sign_in_percentage)?;
        writeln!(out, "Sign-outs:        {} ({:.1}%)", stats.total_sign_outs, stats.sign_out_percentage)?;
        writeln!(
            out,
            "Extra hours:      {:.1} (avg {:.1})",
            stats.total_extra_hours, stats.average_extra_hours
        )?;
        writeln!(out, "Worked hours:     {:.1}", stats.total_worked_hours)?;
        match stats.today {
            Some(today) => writeln!(
                out,
                "Latest day {today}: {} present, {} late, {} absent",
                stats.present_today, stats.late_today, stats.absent_today
            )?,
            None => writeln!(out, "Latest day: none")?,
        }
        if state.rejected_rows > 0 {
            writeln!(out, "Rejected rows:    {}", state.rejected_rows)?;
        }
        writeln!(out)?;

        writeln!(out, "== Daily attendance ({}) ==", self.selection)?;
        writeln!(
            out,
            "{:<8} {:<10} {:>8} {:>9} {:>7} {:>4} {:>6} {:>7}",
            "Day", "Date", "Sign-ins", "Sign-outs", "Present", "Late", "Extra", "Worked"
        )?;
        for day in &self.selected_daily {
            writeln!(
                out,
                "{:<8} {:<10} {:>8} {:>9} {:>7} {:>4} {:>6.1} {:>7.1}",
                day.label, day.date, day.sign_ins, day.sign_outs, day.present, day.late, day.extra_hours, day.worked_hours
            )?;
        }
        writeln!(out)?;

        writeln!(out, "== Departments ==")?;
        for share in &state.departments {
            writeln!(out, "{:<24} {:>4}  {}", share.name, share.value, share.color)?;
        }
        writeln!(out)?;

        if let Some(employee) = &self.employee {
            writeln!(out, "== {} ==", employee.employee)?;
            writeln!(out, "Department:       {}", employee.department)?;
            writeln!(out, "Days recorded:    {}", employee.days_recorded)?;
            writeln!(out, "Sign-ins:         {}", employee.sign_ins)?;
            writeln!(out, "Sign-outs:        {}", employee.sign_outs)?;
            writeln!(out, "Late:             {}", employee.late_count)?;
            writeln!(out, "Extra hours:      {:.1}", employee.total_extra_hours)?;
            writeln!(out, "Worked hours:     {:.1}", employee.total_worked_hours)?;
            writeln!(out)?;
        }

        let insights = &self.insights;
        writeln!(out, "== Insights ==")?;
        writeln!(out, "Late arrivals:    {} ({:.1}%)", insights.late_arrivals, insights.late_rate)?;
        writeln!(
            out,
            "Punctuality:      {:.1}% ({})",
            insights.punctuality_rate,
            insights.rating.label()
        )?;
        writeln!(out, "Completion gap:   {:.1}%", insights.completion_gap)?;
        if let Some(day) = insights.most_active_day {
            writeln!(out, "Most active day:  {day}")?;
        }
        writeln!(out, "Departments:      {}", insights.department_count)?;
        writeln!(out, "Attendance:       {}", insights.attendance_quality.label())?;
        writeln!(out, "Data:             {}", insights.data_completeness.label())?;
        if insights.suggest_sign_out_reminders {
            writeln!(out, "Consider automated sign-out reminders: sign-outs are below 80% of records.")?;
        }
        if insights.high_extra_hours {
            writeln!(out, "High extra hours: consider workload redistribution or staffing adjustments.")?;
        }
        if insights.suggest_flexible_start {
            writeln!(out, "Consider flexible start times: late arrivals exceed 15% of sign-ins.")?;
        }
        Ok(())
    }
}
