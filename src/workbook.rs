//! Reading the first worksheet of an `.xlsx` file into a [`RawSheet`].

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{CellValue, RawSheet};
use crate::pipeline::serial_to_naive;

/// Parse workbook bytes and return the first worksheet's rows.
pub fn read_first_sheet(bytes: &[u8]) -> Result<RawSheet> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::malformed(format!("Error parsing the Excel file: {e}")))?;

    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first().cloned() else {
        return Err(AppError::malformed("Excel file contains no sheets"));
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::malformed(format!("Worksheet '{sheet_name}' could not be read: {e}")))?;

    let rows: Vec<Vec<CellValue>> = range.rows().map(|row| row.iter().map(convert_cell).collect()).collect();
    info!("Raw Excel data loaded from '{sheet_name}': {} rows", rows.len());

    RawSheet::new(rows)
}

/// Map a calamine cell onto the pipeline's cell model.
fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => serial_to_naive(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
