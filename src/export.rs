//! CSV and Excel export of canonical records.

use std::path::{Path, PathBuf};

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};

use crate::error::Result;
use crate::models::AttendanceRecord;
use crate::models::sheet::format_number;

/// Default CSV download name.
pub const CSV_FILE_NAME: &str = "attendance_data.csv";

/// Export column headers, shared by CSV and XLSX.
pub const EXPORT_HEADERS: [&str; 8] = [
    "Employee",
    "Date",
    "Sign In Time",
    "Sign Out Time",
    "Extra Hours",
    "Total Hours",
    "Department",
    "Status",
];

/// `Total Hours` cell text: two decimals, bare `0` when zero.
fn format_total_hours(hours: f64) -> String {
    if hours == 0.0 { "0".to_string() } else { format!("{hours:.2}") }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row(record: &AttendanceRecord) -> [String; 8] {
    [
        record.employee_name.clone(),
        record.date.format("%Y-%m-%d").to_string(),
        record.sign_in_label(),
        record.sign_out_label(),
        format_number(record.extra_hours),
        format_total_hours(record.worked_hours),
        record.department.clone(),
        record.status().label().to_string(),
    ]
}

/// Render records as a CSV document, one line per record after the header.
pub fn records_to_csv(records: &[AttendanceRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));
    for record in records {
        let fields: Vec<String> = csv_row(record).iter().map(|f| escape_csv_field(f)).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// Write the CSV document to `path`.
pub fn write_csv(records: &[AttendanceRecord], path: &Path) -> Result<()> {
    std::fs::write(path, records_to_csv(records))?;
    Ok(())
}

/// Export records to an Excel file with the same columns as the CSV.
pub fn export_records_to_excel(records: &[AttendanceRecord], path: &Path) -> Result<()> {
    let mut workbook = records_workbook(records)?;
    workbook.save(path)?;
    Ok(())
}

fn records_workbook(records: &[AttendanceRecord]) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Attendance")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let hours_format = Format::new().set_num_format("0.00");

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let widths = [30, 12, 12, 13, 12, 12, 25, 10];
    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &record.employee_name)?;
        worksheet.write_string(row, 1, record.date.format("%Y-%m-%d").to_string())?;
        worksheet.write_string(row, 2, record.sign_in_label())?;
        worksheet.write_string(row, 3, record.sign_out_label())?;
        worksheet.write_number(row, 4, record.extra_hours)?;
        worksheet.write_number_with_format(row, 5, record.worked_hours, &hours_format)?;
        worksheet.write_string(row, 6, &record.department)?;
        worksheet.write_string(row, 7, record.status().label())?;
    }

    if !records.is_empty() {
        let last_row = records.len() as u32;
        worksheet.autofilter(0, 0, last_row, (EXPORT_HEADERS.len() - 1) as u16)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook)
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    let dialog = rfd::FileDialog::new().set_file_name(default_name);
    let dialog = if default_name.ends_with(".csv") {
        dialog.add_filter("CSV Files", &["csv"])
    } else {
        dialog.add_filter("Excel Files", &["xlsx"])
    };
    dialog.save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}
