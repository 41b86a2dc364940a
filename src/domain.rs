//! Domain models for the directory export.
//!
//! This module contains the user records returned by the API and the
//! run configuration.

/// User records and the API response envelope.
pub mod user;
pub use user::{COLUMNS, Cell, DirectoryResponse, UserRecord};

/// Run configuration: token, endpoint, output path and mode.
pub mod config;
pub use config::{Config, Mode, Overrides, Settings, Token};
