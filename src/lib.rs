//! Pachca Directory Export
//!
//! Fetches the workspace user directory from the Pachca API and renders it
//! as a spreadsheet or as console text.

pub mod domain;
pub use domain::{COLUMNS, Cell, Config, DirectoryResponse, Mode, Token, UserRecord};

/// HTTP access to the directory endpoint.
pub mod client;
pub use client::{Client, FetchDirectory};

pub mod export;
pub use export::{Exporter, Outcome};

pub mod render;
