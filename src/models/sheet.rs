//! Untyped spreadsheet rows as read from the first worksheet.

use chrono::NaiveDateTime;

use crate::error::{AppError, Result};

/// One raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Native spreadsheet date, a wall-clock value without zone.
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as display text, the way a spreadsheet shows it.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Format a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// First-worksheet contents: row 0 is the header, the rest are data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Wrap rows, requiring a header row and at least one data row.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Result<Self> {
        if rows.len() < 2 {
            return Err(AppError::malformed(
                "Excel file must contain at least a header row and one data row",
            ));
        }
        Ok(Self { rows })
    }

    /// Header labels as display text.
    pub fn header(&self) -> Vec<String> {
        self.rows[0].iter().map(CellValue::as_text).collect()
    }

    /// Data rows (everything after the header).
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        &self.rows[1..]
    }

    /// Number of data rows, blank ones included.
    pub fn data_row_count(&self) -> usize {
        self.rows.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_is_malformed() {
        let result = RawSheet::new(vec![vec!["Employee".into(), "Check In".into()]]);
        assert!(matches!(result, Err(AppError::MalformedWorkbook(_))));
    }

    #[test]
    fn test_empty_sheet_is_malformed() {
        assert!(RawSheet::new(Vec::new()).is_err());
    }

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(!CellValue::Text("x".to_string()).is_blank());
    }

    #[test]
    fn test_number_text() {
        assert_eq!(CellValue::Number(2.0).as_text(), "2");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
    }

    #[test]
    fn test_data_rows() {
        let sheet = RawSheet::new(vec![
            vec!["Employee".into()],
            vec!["Jane".into()],
            vec!["John".into()],
        ])
        .unwrap();
        assert_eq!(sheet.header(), vec!["Employee".to_string()]);
        assert_eq!(sheet.data_row_count(), 2);
        assert_eq!(sheet.data_rows()[1], vec![CellValue::Text("John".to_string())]);
    }
}
