//! # simplesheet-core
//!
//! Opens sheets without the caller needing to know which backend is active.
//!
//! This crate provides:
//! - `SheetConfig`, the environment-style settings for the remote backend
//! - `open_sheet`, the factory choosing between the CSV and Google Sheets stores
//! - Path and JSON helpers that resolve against an explicit base directory
//!
//! ```no_run
//! use simplesheet_core::{open_sheet, OpenOptions, SheetConfig, SheetMode};
//!
//! let config = SheetConfig::from_env();
//! let options = OpenOptions::new(SheetMode::Local).with_base_dir(".");
//! let mut sheet = open_sheet(&options, &config).unwrap();
//! sheet.set_cell(1, 1, "12月").unwrap();
//! sheet.display().unwrap();
//! ```

/// Environment-style configuration.
pub mod config;
/// Sheet factory.
pub mod factory;
/// Path and JSON helpers.
pub mod paths;

pub use config::SheetConfig;
pub use factory::{open_sheet, OpenOptions, SheetMode, DEFAULT_CSV_PATH};
pub use paths::{expand_home, load_json, resolve_path};

/// Re-export the sheet engine.
pub use simplesheet_sheet::{Cell, Result, Row, Sheet, SheetError};
/// Re-export remote credential types.
pub use simplesheet_remote::{ClientOptions, Credentials, ServiceAccountKey};
