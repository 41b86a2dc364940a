use std::io::Write;

use super::{Error, Table};
use crate::COLUMNS;

/// Formats one row as `Header: value` pairs joined by `", "`.
#[must_use]
pub fn format_row(header: &[&str], row: &[crate::Cell<'_>]) -> String {
    header
        .iter()
        .zip(row)
        .map(|(name, cell)| format!("{name}: {cell}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes one line per user to `out`.
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns [`Error::Io`] if `out` cannot be written.
pub fn write(table: &Table<'_>, out: &mut impl Write) -> Result<usize, Error> {
    for row in table.rows() {
        writeln!(out, "{}", format_row(&COLUMNS, row))?;
    }
    out.flush()?;
    Ok(table.len())
}
