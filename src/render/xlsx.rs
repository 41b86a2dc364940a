use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::{debug, instrument};

use super::{Error, Table};
use crate::{COLUMNS, Cell};

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Sheet1";

/// Largest magnitude an `f64` holds exactly; beyond it IDs are written as text.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Builds a workbook with a header row in row 1 and one user per row after
/// it, columns A to I.
///
/// Absent optional fields are empty strings, which the writer leaves as
/// blank cells.
///
/// # Errors
///
/// Returns [`Error::Spreadsheet`] if a cell cannot be written.
pub fn build(table: &Table<'_>) -> Result<Workbook, Error> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(COLUMNS) {
        worksheet.write_string(0, col, name)?;
    }

    for (row, cells) in (1u32..).zip(table.rows()) {
        write_row(worksheet, row, cells)?;
    }

    worksheet.autofit();
    Ok(workbook)
}

/// Writes the table to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Spreadsheet`] if the workbook cannot be built or saved.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn save(table: &Table<'_>, path: &Path) -> Result<(), Error> {
    let mut workbook = build(table)?;
    workbook.save(path)?;
    debug!("workbook saved");
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row: u32, cells: &[Cell<'_>]) -> Result<(), Error> {
    for (col, cell) in (0u16..).zip(cells) {
        match *cell {
            Cell::Integer(value) => write_integer(worksheet, row, col, value)?,
            Cell::Text(value) => worksheet.write_string(row, col, value)?,
        };
    }
    Ok(())
}

// Spreadsheet numbers are doubles.
#[allow(clippy::cast_precision_loss)]
fn write_integer(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: i64,
) -> Result<&mut Worksheet, Error> {
    let written = if value.unsigned_abs() <= MAX_EXACT_INTEGER {
        worksheet.write_number(row, col, value as f64)?
    } else {
        worksheet.write_string(row, col, value.to_string())?
    };
    Ok(written)
}
