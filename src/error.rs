//! Error types and handling.

use thiserror::Error;

use crate::pipeline::ColumnRole;

/// Application-wide error type.
///
/// Any error during a load resets the dashboard and its message is shown
/// instead of data.
#[derive(Error, Debug)]
pub enum AppError {
    /// No candidate source produced a readable, non-empty byte stream
    #[error("Acquisition error: {0}")]
    Acquisition(String),

    /// Workbook has no sheets, cannot be opened, or has no data rows
    #[error("Malformed workbook: {0}")]
    MalformedWorkbook(String),

    /// A required column role could not be resolved from the header row
    #[error("Could not find {role} column in Excel file. Expected column: \"{expected}\"", expected = .role.expected_header())]
    MissingColumn { role: ColumnRole },

    /// Every data row was rejected
    #[error("No valid attendance records found. Processed {rows} rows but found no valid sign-in times.")]
    NoValidRecords { rows: usize },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create an acquisition error with message
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Create a malformed workbook error with message
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedWorkbook(msg.into())
    }
}
