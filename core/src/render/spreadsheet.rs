//! XLSX encoder backed by `rust_xlsxwriter`.

use crate::error::{AppError, AppResult};
use crate::projection::{has_headers, Cell, Column, Projection};
use crate::render::DocumentRenderer;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

/// Writes one worksheet: an optional bold header row followed by the projected rows.
#[derive(Debug, Clone)]
pub struct SpreadsheetRenderer {
    /// Worksheet name (at most 31 characters).
    pub sheet_name: String,
    /// Width applied to every column, in character units.
    pub column_width: f64,
}

impl Default for SpreadsheetRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Export".to_string(),
            column_width: 24.0,
        }
    }
}

impl DocumentRenderer for SpreadsheetRenderer {
    fn render(&self, columns: &[Column], projection: &Projection) -> AppResult<Vec<u8>> {
        self.build(columns, projection)
            .map_err(|e| AppError::Render(format!("xlsx: {}", e)))
    }
}

impl SpreadsheetRenderer {
    fn build(&self, columns: &[Column], projection: &Projection) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let wrap = Format::new().set_text_wrap();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.as_str())?;
        for col in 0..columns.len() {
            worksheet.set_column_width(col as u16, self.column_width)?;
        }

        let mut row: u32 = 0;
        if has_headers(columns) {
            for (col, column) in columns.iter().enumerate() {
                worksheet.write_string_with_format(row, col as u16, column.header.as_str(), &bold)?;
            }
            row += 1;
        }

        match projection {
            Projection::Table(rows) => {
                for cells in rows {
                    for (col, cell) in cells.iter().enumerate() {
                        write_cell(worksheet, row, col as u16, cell, &wrap)?;
                    }
                    row += 1;
                }
            }
            Projection::List(entries) => {
                for entry in entries {
                    if !entry.label.is_empty() {
                        worksheet.write_string(row, 0, entry.label.as_str())?;
                    }
                    write_cell(worksheet, row, 1, &entry.value, &wrap)?;
                    row += 1;
                }
            }
        }

        workbook.save_to_buffer()
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    wrap: &Format,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Empty => {}
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Cell::Number(n) => match n.as_f64() {
            Some(value) => {
                worksheet.write_number(row, col, value)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        Cell::Text(text) if text.contains('\n') => {
            worksheet.write_string_with_format(row, col, text.as_str(), wrap)?;
        }
        Cell::Text(text) => {
            worksheet.write_string(row, col, text.as_str())?;
        }
    }
    Ok(())
}
