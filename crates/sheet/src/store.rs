//! Persistence strategies plugged into a [`crate::Sheet`].
//!
//! The sheet applies every mutation to its in-memory [`Grid`] first and then
//! hands the result to its store. A store that fails leaves the local grid
//! already mutated; nothing is rolled back.

use crate::error::Result;
use crate::grid::Grid;

/// Backing store for a sheet.
pub trait SheetStore {
    /// Short human-readable description of the backing store (used in logs).
    fn describe(&self) -> String;

    /// Load the initial grid contents.
    fn load(&mut self) -> Result<Grid>;

    /// Called after `set_cell` has been applied to `grid`.
    fn on_set_cell(&mut self, grid: &Grid, row: usize, col: usize, value: &str) -> Result<()>;

    /// Called after `append_row` has added `values` as row number `row`.
    fn on_append_row(&mut self, grid: &Grid, row: usize, values: &[String]) -> Result<()>;

    /// Called after the grid has been cleared.
    fn on_clear(&mut self, grid: &Grid) -> Result<()>;
}

/// Store that keeps nothing outside the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore;

impl SheetStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&mut self) -> Result<Grid> {
        Ok(Grid::new())
    }

    fn on_set_cell(&mut self, _grid: &Grid, _row: usize, _col: usize, _value: &str) -> Result<()> {
        Ok(())
    }

    fn on_append_row(&mut self, _grid: &Grid, _row: usize, _values: &[String]) -> Result<()> {
        Ok(())
    }

    fn on_clear(&mut self, _grid: &Grid) -> Result<()> {
        Ok(())
    }
}
