//! The fetch → decode → render pipeline.

use std::{io::Write, path::PathBuf};

use tracing::{info, instrument};

use crate::{
    client::{self, FetchDirectory},
    domain::{Config, Mode},
    render::{self, Table},
};

/// Runs one export in a fixed mode.
#[derive(Debug, Clone)]
pub struct Exporter {
    mode: Mode,
    output: PathBuf,
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A spreadsheet was written.
    Saved {
        /// Number of users written.
        users: usize,
        /// Where the spreadsheet was written.
        path: PathBuf,
    },
    /// Lines were printed.
    Printed {
        /// Number of users printed.
        users: usize,
    },
}

impl Exporter {
    /// Creates an exporter. `output` is only used in [`Mode::Xlsx`].
    #[must_use]
    pub fn new(mode: Mode, output: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            output: output.into(),
        }
    }

    /// Creates an exporter from a resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mode(), config.output())
    }

    /// Fetches the directory from `source`, decodes it and renders it.
    ///
    /// Text mode writes to `out`. Nothing is written anywhere unless the
    /// whole response was fetched and decoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] for transport, API and decode failures and
    /// [`Error::Render`] if the output cannot be written.
    #[instrument(skip_all, fields(mode = %self.mode))]
    pub fn run(
        &self,
        source: &impl FetchDirectory,
        out: &mut impl Write,
    ) -> Result<Outcome, Error> {
        let body = source.fetch()?;
        let directory = client::decode(&body)?;
        info!(users = directory.data.len(), "directory decoded");

        let table = Table::new(&directory.data);
        match self.mode {
            Mode::Xlsx => {
                render::xlsx::save(&table, &self.output)?;
                Ok(Outcome::Saved {
                    users: table.len(),
                    path: self.output.clone(),
                })
            }
            Mode::Text => {
                let users = render::text::write(&table, out)?;
                Ok(Outcome::Printed { users })
            }
        }
    }
}

/// Errors from a single export run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The directory could not be fetched or decoded.
    #[error(transparent)]
    Fetch(#[from] client::Error),

    /// The directory could not be rendered.
    #[error(transparent)]
    Render(#[from] render::Error),
}
