//! Attendance record normalization.
//!
//! Takes a loosely structured sheet (unknown column order, mixed date/time
//! encodings, optional columns) and produces canonical [`AttendanceRecord`]s:
//!
//! 1. [`columns::classify`] maps header labels to roles.
//! 2. [`cell::CellInterpreter`] reads timestamp cells.
//! 3. [`builder::RecordBuilder`] derives worked hours, lateness and
//!    department, and accepts or rejects each row.
//!
//! [`AttendanceRecord`]: crate::models::AttendanceRecord

mod builder;
mod cell;
mod columns;
mod department;
mod zone;

#[cfg(test)]
mod tests;

use chrono::NaiveTime;
use tracing::info;

use crate::error::Result;
use crate::models::RawSheet;

// Re-export public API
pub use builder::{BuildReport, RecordBuilder, SkipReason, SkippedRow, parse_hours, worked_hours};
pub use cell::{CellInterpreter, serial_to_instant, serial_to_naive};
pub use columns::{ColumnMap, ColumnRole, classify, role_for_header};
pub use department::{DEFAULT_DEPARTMENT, infer_department, resolve_department};
pub use zone::ZoneSetting;

/// Sign-ins strictly after this time of day are late.
pub fn default_late_after() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Inputs that affect how cells are read and records derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub zone: ZoneSetting,
    pub late_after: NaiveTime,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            zone: ZoneSetting::Local,
            late_after: default_late_after(),
        }
    }
}

impl PipelineOptions {
    pub fn with_zone(zone: ZoneSetting) -> Self {
        Self {
            zone,
            ..Self::default()
        }
    }
}

/// Classify the header row and build records for every data row.
pub fn normalize(sheet: &RawSheet, options: &PipelineOptions) -> Result<BuildReport> {
    let header = sheet.header();
    info!("Headers detected: {header:?}");

    let columns = classify(&header)?;
    info!("Column mapping: {columns:?}");

    RecordBuilder::new(columns, options).build(sheet)
}
