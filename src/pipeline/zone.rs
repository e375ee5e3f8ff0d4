//! Time zone used to decompose absolute instants into calendar date and clock time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Zone in which dates and times of day are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneSetting {
    /// Whatever zone the running process is in.
    #[default]
    Local,
    /// A fixed IANA zone.
    Named(Tz),
}

impl ZoneSetting {
    /// Split an instant into `(date, time)` with seconds truncated.
    pub fn decompose(&self, instant: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
        let naive = match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
        };
        (naive.date(), truncate_to_minute(naive.time()))
    }

    /// Read a wall-clock value in this zone.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times that
    /// do not exist (DST spring-forward gap) yield `None`.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => Local.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc)),
            Self::Named(tz) => tz.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl FromStr for ZoneSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| format!("Unknown time zone '{trimmed}'"))
    }
}

impl fmt::Display for ZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
