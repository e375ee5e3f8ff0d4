//! Derived analytics shown on the reports view.

use chrono::NaiveDate;
use serde::Serialize;

use super::{DailyAttendance, DepartmentShare, SummaryStats, percentage};
use crate::models::AttendanceRecord;

/// Late-rate share above which flexible start times are suggested.
const FLEXIBLE_START_LATE_RATE: f64 = 15.0;

/// Sign-out percentage below which reminders are suggested.
const SIGN_OUT_REMINDER_PERCENTAGE: f64 = 80.0;

/// Extra hours per record above which workload is flagged.
const HIGH_EXTRA_HOURS_PER_RECORD: f64 = 0.5;

/// Punctuality band by late rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PunctualityRating {
    /// Under 10% of sign-ins late.
    Excellent,
    /// Under 20% of sign-ins late.
    Good,
    NeedsAttention,
}

impl PunctualityRating {
    pub fn from_late_rate(late_rate: f64) -> Self {
        if late_rate < 10.0 {
            Self::Excellent
        } else if late_rate < 20.0 {
            Self::Good
        } else {
            Self::NeedsAttention
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsAttention => "Needs Attention",
        }
    }
}

/// Sign-in and sign-out coverage band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceQuality {
    /// Over 90% sign-ins and over 80% sign-outs.
    Excellent,
    /// Over 75% sign-ins and over 60% sign-outs.
    Good,
    NeedsImprovement,
}

impl AttendanceQuality {
    pub fn from_percentages(sign_in: f64, sign_out: f64) -> Self {
        if sign_in > 90.0 && sign_out > 80.0 {
            Self::Excellent
        } else if sign_in > 75.0 && sign_out > 60.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Records-per-employee band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataCompleteness {
    /// More than 15 records per employee.
    Comprehensive,
    /// More than 8 records per employee.
    Adequate,
    Limited,
}

impl DataCompleteness {
    pub fn from_counts(records: usize, employees: usize) -> Self {
        if records > employees * 15 {
            Self::Comprehensive
        } else if records > employees * 8 {
            Self::Adequate
        } else {
            Self::Limited
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Comprehensive => "Comprehensive",
            Self::Adequate => "Adequate",
            Self::Limited => "Limited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub late_arrivals: usize,
    /// Late arrivals as a percentage of sign-ins.
    pub late_rate: f64,
    /// `100 - late_rate`, or zero without sign-ins.
    pub punctuality_rate: f64,
    /// Absolute gap between sign-in and sign-out percentages.
    pub completion_gap: f64,
    /// Date with the most sign-ins plus sign-outs; earliest wins ties.
    pub most_active_day: Option<NaiveDate>,
    pub department_count: usize,
    pub rating: PunctualityRating,
    pub attendance_quality: AttendanceQuality,
    pub data_completeness: DataCompleteness,
    pub suggest_flexible_start: bool,
    pub suggest_sign_out_reminders: bool,
    pub high_extra_hours: bool,
}

/// Analytics over the records and their already-derived stats and series.
pub fn insights(
    records: &[AttendanceRecord],
    stats: &SummaryStats,
    daily: &[DailyAttendance],
    departments: &[DepartmentShare],
) -> Insights {
    let late_arrivals = records.iter().filter(|r| r.late).count();
    let late_rate = percentage(late_arrivals, stats.total_sign_ins);
    let punctuality_rate = if stats.total_sign_ins == 0 { 0.0 } else { 100.0 - late_rate };

    let mut most_active: Option<(NaiveDate, usize)> = None;
    for day in daily {
        let activity = day.sign_ins + day.sign_outs;
        if most_active.is_none_or(|(_, best)| activity > best) {
            most_active = Some((day.date, activity));
        }
    }

    Insights {
        late_arrivals,
        late_rate,
        punctuality_rate,
        completion_gap: (stats.sign_in_percentage - stats.sign_out_percentage).abs(),
        most_active_day: most_active.map(|(date, _)| date),
        department_count: departments.len(),
        rating: PunctualityRating::from_late_rate(late_rate),
        attendance_quality: AttendanceQuality::from_percentages(stats.sign_in_percentage, stats.sign_out_percentage),
        data_completeness: DataCompleteness::from_counts(stats.total_records, stats.total_employees),
        suggest_flexible_start: late_rate > FLEXIBLE_START_LATE_RATE,
        suggest_sign_out_reminders: stats.sign_out_percentage < SIGN_OUT_REMINDER_PERCENTAGE,
        high_extra_hours: stats.total_extra_hours > stats.total_records as f64 * HIGH_EXTRA_HOURS_PER_RECORD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::*;
    use crate::aggregate::{Aggregate, aggregate};

    fn insights_for(records: &[AttendanceRecord]) -> Insights {
        let Aggregate {
            stats,
            daily,
            departments,
            ..
        } = aggregate(records);
        insights(records, &stats, &daily, &departments)
    }

    #[test]
    fn test_insights() {
        let records = vec![
            signed_out(record("Ann", "2024-01-01", "09:00"), "17:00", 8.0),
            record("Bob", "2024-01-01", "10:30"),
            signed_out(record("Ann", "2024-01-02", "09:00"), "17:00", 8.0),
            signed_out(record("Bob", "2024-01-02", "09:10"), "17:00", 7.8),
        ];
        let result = insights_for(&records);

        assert_eq!(result.late_arrivals, 1);
        assert_eq!(result.late_rate, 25.0);
        assert_eq!(result.punctuality_rate, 75.0);
        assert_eq!(result.completion_gap, 25.0);
        assert_eq!(result.most_active_day, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(result.department_count, 1);
        assert_eq!(result.rating, PunctualityRating::NeedsAttention);
        assert!(result.suggest_flexible_start);
    }

    #[test]
    fn test_most_active_tie_keeps_earliest() {
        let records = vec![record("Ann", "2024-01-01", "09:00"), record("Ann", "2024-01-02", "09:00")];
        let result = insights_for(&records);
        assert_eq!(result.most_active_day, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(result.rating, PunctualityRating::Excellent);
    }

    #[test]
    fn test_empty() {
        let result = insights_for(&[]);
        assert_eq!(result.late_rate, 0.0);
        assert_eq!(result.punctuality_rate, 0.0);
        assert_eq!(result.most_active_day, None);
        assert!(!result.suggest_flexible_start);
        assert!(!result.high_extra_hours);
        assert_eq!(result.data_completeness, DataCompleteness::Limited);
    }

    #[test]
    fn test_recommendations() {
        let records = vec![
            with_extra(signed_out(record("Ann", "2024-01-01", "09:00"), "17:00", 8.0), 1.0),
            with_extra(record("Ann", "2024-01-02", "09:00"), 0.5),
        ];
        let result = insights_for(&records);
        assert!(result.suggest_sign_out_reminders);
        assert!(result.high_extra_hours);

        let records = vec![
            with_extra(signed_out(record("Ann", "2024-01-01", "09:00"), "17:00", 8.0), 0.5),
            signed_out(record("Ann", "2024-01-02", "09:00"), "17:00", 8.0),
        ];
        let result = insights_for(&records);
        assert!(!result.suggest_sign_out_reminders);
        assert!(!result.high_extra_hours);
        assert_eq!(result.attendance_quality, AttendanceQuality::Excellent);
    }

    #[test]
    fn test_attendance_quality_bands() {
        assert_eq!(AttendanceQuality::from_percentages(90.1, 80.1), AttendanceQuality::Excellent);
        assert_eq!(AttendanceQuality::from_percentages(90.0, 100.0), AttendanceQuality::Good);
        assert_eq!(AttendanceQuality::from_percentages(100.0, 80.0), AttendanceQuality::Good);
        assert_eq!(AttendanceQuality::from_percentages(75.1, 60.1), AttendanceQuality::Good);
        assert_eq!(AttendanceQuality::from_percentages(75.0, 100.0), AttendanceQuality::NeedsImprovement);
        assert_eq!(AttendanceQuality::from_percentages(100.0, 60.0), AttendanceQuality::NeedsImprovement);
    }

    #[test]
    fn test_data_completeness_bands() {
        assert_eq!(DataCompleteness::from_counts(31, 2), DataCompleteness::Comprehensive);
        assert_eq!(DataCompleteness::from_counts(30, 2), DataCompleteness::Adequate);
        assert_eq!(DataCompleteness::from_counts(17, 2), DataCompleteness::Adequate);
        assert_eq!(DataCompleteness::from_counts(16, 2), DataCompleteness::Limited);
        assert_eq!(DataCompleteness::from_counts(0, 0), DataCompleteness::Limited);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(PunctualityRating::from_late_rate(9.9), PunctualityRating::Excellent);
        assert_eq!(PunctualityRating::from_late_rate(10.0), PunctualityRating::Good);
        assert_eq!(PunctualityRating::from_late_rate(19.9), PunctualityRating::Good);
        assert_eq!(PunctualityRating::from_late_rate(20.0), PunctualityRating::NeedsAttention);
    }
}
