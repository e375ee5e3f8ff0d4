//! Data models for raw sheets and canonical attendance records.

pub mod attendance;
pub mod sheet;

pub use attendance::{AttendanceRecord, AttendanceStatus, ParsedTimestamp};
pub use sheet::{CellValue, RawSheet};
