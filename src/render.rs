//! Rendering of the directory as a spreadsheet or as console text.

use crate::domain::{Cell, UserRecord};

/// Plain-text rendering, one line per user.
pub mod text;
/// Spreadsheet rendering.
pub mod xlsx;

/// The directory laid out as one row per user, in [`COLUMNS`](crate::COLUMNS) order.
///
/// Both renderers read from this, so the two output modes always agree on
/// column order and on how absent fields are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<'a> {
    rows: Vec<[Cell<'a>; 9]>,
}

impl<'a> Table<'a> {
    /// Lays out `users` in the order given.
    #[must_use]
    pub fn new(users: &'a [UserRecord]) -> Self {
        Self {
            rows: users.iter().map(UserRecord::cells).collect(),
        }
    }

    /// Data rows, excluding the header.
    #[must_use]
    pub fn rows(&self) -> &[[Cell<'a>; 9]] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Errors raised while writing output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The spreadsheet could not be built or saved.
    #[error("Ошибка при сохранении таблицы")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Standard output could not be written.
    #[error("Ошибка вывода")]
    Io(#[from] std::io::Error),
}
