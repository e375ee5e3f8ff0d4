//! Canonical attendance records and their parsed timestamps.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A successfully interpreted timestamp cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    /// Calendar date in the configured zone.
    pub date: NaiveDate,
    /// Time of day in the configured zone, seconds truncated.
    pub time: NaiveTime,
    /// Absolute point in time.
    pub instant: DateTime<Utc>,
}

impl ParsedTimestamp {
    /// `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM`, 24-hour, zero-padded.
    pub fn time_string(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// One accepted row of the attendance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub employee_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub sign_in_time: Option<NaiveTime>,
    #[serde(with = "hhmm")]
    pub sign_out_time: Option<NaiveTime>,
    pub extra_hours: f64,
    pub worked_hours: f64,
    pub department: String,
    pub present: bool,
    pub late: bool,
    pub has_sign_in: bool,
    pub has_sign_out: bool,
}

/// Row status shown in tables and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Late,
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Late => "Late",
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }
}

impl AttendanceRecord {
    /// Late takes precedence over Present, which takes precedence over Absent.
    pub fn status(&self) -> AttendanceStatus {
        if self.late {
            AttendanceStatus::Late
        } else if self.present {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        }
    }

    pub fn sign_in_label(&self) -> String {
        self.sign_in_time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
    }

    pub fn sign_out_label(&self) -> String {
        self.sign_out_time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
    }
}

/// Serde adapter for optional `HH:MM` times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
