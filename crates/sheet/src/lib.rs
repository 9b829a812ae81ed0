//! Grid engine for simplesheet
//!
//! A [`Sheet`] is a ragged 2D grid of optional strings addressed with 1-based
//! coordinates, paired with a [`SheetStore`] that persists every mutation.
//! The in-memory, CSV and remote backends all share the same engine.
//!
//! # Examples
//!
//! ## In-memory sheet
//!
//! ```
//! use simplesheet_sheet::Sheet;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(1, 1, "12月").unwrap();
//!
//! assert_eq!(sheet.get_max_row(), 1);
//! assert_eq!(sheet.get_max_column(), 1);
//! assert_eq!(sheet.get_cell(1, 1).unwrap().as_str(), Some("12月"));
//! ```
//!
//! ## Rows and columns
//!
//! ```
//! use simplesheet_sheet::Sheet;
//!
//! let mut sheet = Sheet::new();
//! assert_eq!(sheet.append_row(["a", "b"]).unwrap(), 1);
//! assert_eq!(sheet.append_row(["c"]).unwrap(), 2);
//! assert_eq!(
//!     sheet.get_column(2).unwrap(),
//!     vec![Some("b".to_string()), None]
//! );
//! ```
//!
//! ## CSV-backed sheet
//!
//! ```no_run
//! use simplesheet_sheet::Sheet;
//!
//! let mut sheet = Sheet::open_csv("sheets/attendance.csv").unwrap();
//! sheet.append_row(["id", "name"]).unwrap();
//! sheet.display().unwrap();
//! ```

pub mod a1_notation;
mod cell;
mod csv;
mod error;
mod grid;
mod render;
mod sheet;
mod store;

/// Re-export cell type.
pub use cell::Cell;
/// Re-export CSV store and helpers.
pub use csv::{read_grid, write_rows, write_rows_to_path, CsvStore};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export grid types.
pub use grid::{Grid, Row};
/// Re-export rendering helpers.
pub use render::{display_width, render_table};
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export persistence strategy types.
pub use store::{MemoryStore, SheetStore};
