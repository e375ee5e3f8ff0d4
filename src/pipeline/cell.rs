//! Interpretation of a single timestamp cell.

use chrono::{Datelike, DateTime, NaiveDate, NaiveDateTime, Utc};

use super::zone::ZoneSetting;
use crate::models::{CellValue, ParsedTimestamp};

/// Serial day number of 1970-01-01 in the 1900 date system (epoch 1899-12-30).
const SERIAL_UNIX_EPOCH_DAYS: f64 = 25569.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest representable instant, in milliseconds either side of the Unix epoch.
const MAX_INSTANT_MILLIS: f64 = 8.64e15;

/// Naive date-time layouts read in the configured zone.
///
/// Two-digit-year layouts come before their four-digit counterparts.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%d-%B-%y %H:%M:%S",
    "%d-%B-%y %H:%M",
    "%d-%B-%Y %H:%M:%S",
    "%d-%B-%Y %H:%M",
];

/// Date-only layouts read as local midnight.
const LOCAL_DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d-%B-%y",
    "%d-%B-%Y",
];

/// Years below this come from a two-digit year read by a four-digit field.
const MIN_PLAUSIBLE_YEAR: i32 = 1000;

fn parse_naive_datetime(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, fmt)
        .ok()
        .filter(|naive| naive.year() >= MIN_PLAUSIBLE_YEAR)
}

fn parse_naive_date(text: &str, fmt: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .filter(|date| date.year() >= MIN_PLAUSIBLE_YEAR)
}

/// Converts raw cells into [`ParsedTimestamp`] values.
///
/// Never fails: anything that cannot be read as a point in time yields `None`,
/// and the caller decides whether that matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellInterpreter {
    zone: ZoneSetting,
}

impl CellInterpreter {
    pub fn new(zone: ZoneSetting) -> Self {
        Self { zone }
    }

    /// Interpret one cell.
    pub fn interpret(&self, cell: &CellValue) -> Option<ParsedTimestamp> {
        let instant = match cell {
            CellValue::Empty | CellValue::Bool(_) => None,
            CellValue::Number(serial) => serial_to_instant(*serial),
            CellValue::DateTime(naive) => self.zone.localize(*naive),
            CellValue::Text(text) => self.parse_text(text),
        }?;

        let (date, time) = self.zone.decompose(instant);
        Some(ParsedTimestamp { date, time, instant })
    }

    fn parse_text(&self, raw: &str) -> Option<DateTime<Utc>> {
        let text = raw.trim();
        if text.is_empty() || text == "undefined" || text == "null" {
            return None;
        }

        // Most exports use this exact layout
        if let Some(naive) = parse_naive_datetime(text, "%Y-%m-%d %H:%M:%S") {
            return self.zone.localize(naive);
        }

        self.parse_general(text)
    }

    /// Last-resort parser covering ISO 8601, RFC 2822, US and month-name layouts.
    fn parse_general(&self, text: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Some(dt.with_timezone(&Utc));
        }

        for fmt in NAIVE_DATETIME_FORMATS {
            if let Some(naive) = parse_naive_datetime(text, fmt) {
                return self.zone.localize(naive);
            }
        }

        // ISO date-only values are UTC midnight
        if let Some(date) = parse_naive_date(text, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }

        for fmt in LOCAL_DATE_FORMATS {
            if let Some(date) = parse_naive_date(text, fmt) {
                return date.and_hms_opt(0, 0, 0).and_then(|naive| self.zone.localize(naive));
            }
        }

        None
    }
}

/// Convert a spreadsheet date serial into an absolute instant.
///
/// Zero is treated as an empty cell.
pub fn serial_to_instant(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial == 0.0 {
        return None;
    }
    let millis = ((serial - SERIAL_UNIX_EPOCH_DAYS) * MILLIS_PER_DAY).round();
    if millis.abs() > MAX_INSTANT_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Convert a native spreadsheet date serial into a wall-clock value.
pub fn serial_to_naive(serial: f64) -> Option<NaiveDateTime> {
    serial_to_instant(serial).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    fn utc() -> CellInterpreter {
        CellInterpreter::new(ZoneSetting::Named(chrono_tz::UTC))
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial_45000() {
        let parsed = utc().interpret(&CellValue::Number(45000.0)).unwrap();
        assert_eq!(parsed.date_string(), "2023-03-15");
        assert_eq!(parsed.time_string(), "00:00");
    }

    #[test]
    fn test_serial_with_fraction() {
        let parsed = utc().interpret(&CellValue::Number(45000.375)).unwrap();
        assert_eq!(parsed.date, ymd(2023, 3, 15));
        assert_eq!(parsed.time, hm(9, 0));
        assert_eq!(parsed.instant, Utc.with_ymd_and_hms(2023, 3, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_serial_decomposed_in_zone() {
        let interpreter = CellInterpreter::new(ZoneSetting::Named(chrono_tz::America::New_York));
        let parsed = interpreter.interpret(&CellValue::Number(45000.0)).unwrap();
        assert_eq!(parsed.date, ymd(2023, 3, 14));
        assert_eq!(parsed.time, hm(20, 0));
    }

    #[test]
    fn test_zero_and_non_finite_serials() {
        assert!(utc().interpret(&CellValue::Number(0.0)).is_none());
        assert!(utc().interpret(&CellValue::Number(f64::NAN)).is_none());
        assert!(utc().interpret(&CellValue::Number(f64::INFINITY)).is_none());
        assert!(utc().interpret(&CellValue::Number(1e12)).is_none());
    }

    #[test]
    fn test_null_like_strings() {
        let interpreter = utc();
        assert!(interpreter.interpret(&CellValue::Empty).is_none());
        assert!(interpreter.interpret(&text("")).is_none());
        assert!(interpreter.interpret(&text("   ")).is_none());
        assert!(interpreter.interpret(&text("undefined")).is_none());
        assert!(interpreter.interpret(&text("null")).is_none());
        assert!(interpreter.interpret(&CellValue::Bool(true)).is_none());
    }

    #[test]
    fn test_standard_layout() {
        let parsed = utc().interpret(&text("2024-01-01 09:30:00")).unwrap();
        assert_eq!(parsed.date_string(), "2024-01-01");
        assert_eq!(parsed.time_string(), "09:30");
    }

    #[test]
    fn test_standard_layout_uses_configured_zone() {
        let interpreter = CellInterpreter::new(ZoneSetting::Named(chrono_tz::Asia::Ho_Chi_Minh));
        let parsed = interpreter.interpret(&text("2024-01-01 09:30:00")).unwrap();
        assert_eq!(parsed.time, hm(9, 30));
        assert_eq!(parsed.instant, Utc.with_ymd_and_hms(2024, 1, 1, 2, 30, 0).unwrap());
    }

    #[test]
    fn test_seconds_truncated() {
        let parsed = utc().interpret(&text("2024-01-01 09:59:59")).unwrap();
        assert_eq!(parsed.time_string(), "09:59");
    }

    #[test]
    fn test_iso_with_offset() {
        let interpreter = CellInterpreter::new(ZoneSetting::Named(chrono_tz::Asia::Ho_Chi_Minh));
        let parsed = interpreter.interpret(&text("2024-01-01T09:00:00Z")).unwrap();
        assert_eq!(parsed.time, hm(16, 0));
        assert_eq!(parsed.date, ymd(2024, 1, 1));
    }

    #[test]
    fn test_iso_without_offset() {
        let parsed = utc().interpret(&text("2024-01-01T08:45")).unwrap();
        assert_eq!(parsed.time, hm(8, 45));
        let parsed = utc().interpret(&text("2024-01-01T08:45:10.250")).unwrap();
        assert_eq!(parsed.time, hm(8, 45));
    }

    #[test]
    fn test_us_layouts() {
        let parsed = utc().interpret(&text("1/2/2024 9:05:00 AM")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 2));
        assert_eq!(parsed.time, hm(9, 5));

        let parsed = utc().interpret(&text("01/02/2024 5:30 PM")).unwrap();
        assert_eq!(parsed.time, hm(17, 30));

        let parsed = utc().interpret(&text("12/31/2023 18:00")).unwrap();
        assert_eq!(parsed.date, ymd(2023, 12, 31));
    }

    #[test]
    fn test_two_digit_years() {
        let parsed = utc().interpret(&text("1/15/24 9:30")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 15));
        assert_eq!(parsed.time, hm(9, 30));

        let parsed = utc().interpret(&text("1/15/24 5:30 PM")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 15));
        assert_eq!(parsed.time, hm(17, 30));

        let parsed = utc().interpret(&text("1/15/24")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 15));
        assert_eq!(parsed.time, hm(0, 0));
    }

    #[test]
    fn test_implausible_years_rejected() {
        assert!(utc().interpret(&text("24-01-15 09:30:00")).is_none());
        assert!(utc().interpret(&text("0024-01-15")).is_none());
    }

    #[test]
    fn test_month_name_layouts() {
        let parsed = utc().interpret(&text("Jan 15, 2024 09:30")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 15));
        assert_eq!(parsed.time, hm(9, 30));

        let parsed = utc().interpret(&text("15-Jan-2024 09:30")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 15));
        assert_eq!(parsed.time, hm(9, 30));

        let parsed = utc().interpret(&text("March 3, 2024 6:15 PM")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 3, 3));
        assert_eq!(parsed.time, hm(18, 15));

        let parsed = utc().interpret(&text("Jan 15, 2024")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 1, 15));
    }

    #[test]
    fn test_date_only() {
        let parsed = utc().interpret(&text("2024-02-29")).unwrap();
        assert_eq!(parsed.date, ymd(2024, 2, 29));
        assert_eq!(parsed.time, hm(0, 0));
    }

    #[test]
    fn test_unparseable_text() {
        assert!(utc().interpret(&text("not a date")).is_none());
        assert!(utc().interpret(&text("2024-13-45 25:00:00")).is_none());
        assert!(utc().interpret(&text("absent")).is_none());
    }

    #[test]
    fn test_native_datetime() {
        let naive = ymd(2024, 5, 6).and_hms_opt(10, 1, 30).unwrap();
        let parsed = utc().interpret(&CellValue::DateTime(naive)).unwrap();
        assert_eq!(parsed.date, ymd(2024, 5, 6));
        assert_eq!(parsed.time, hm(10, 1));
    }

    #[test]
    fn test_serial_to_naive() {
        let naive = serial_to_naive(45000.5).unwrap();
        assert_eq!(naive, ymd(2023, 3, 15).and_hms_opt(12, 0, 0).unwrap());
    }
}
