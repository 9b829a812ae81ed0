use crate::cell::Cell;
use crate::error::{Result, SheetError};
use crate::render;
use std::fmt;

/// One row of the grid. `None` marks a position that was never written.
pub type Row = Vec<Option<String>>;

/// A ragged 2D array of optional strings addressed with 1-based coordinates.
///
/// Rows may have different lengths. The grid only grows on writes and only
/// shrinks through [`Grid::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Create a new empty grid
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from storage records, mapping empty fields to `None`.
    ///
    /// Stores cannot tell an explicit empty string from an unwritten cell, so
    /// both come back as absent after a reload.
    pub fn from_records<I, R, S>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(Into::into)
                    .map(|field: String| if field.is_empty() { None } else { Some(field) })
                    .collect()
            })
            .collect();
        Grid { rows }
    }

    // ===== Cell Access =====

    /// Write `value` at (row, col), growing rows and columns as needed
    pub fn set_cell<V: ToString>(&mut self, row: usize, col: usize, value: V) -> Result<()> {
        validate_row_col(row, col)?;
        let value = Some(value.to_string());

        if let Some(row_data) = self.rows.get_mut(row - 1) {
            reserve(row_data, col, "col")?;
            if row_data.len() < col {
                row_data.resize(col, None);
            }
            row_data[col - 1] = value;
            return Ok(());
        }

        // Allocate before touching the grid so a failure leaves it unchanged
        let mut row_data = Row::new();
        reserve(&mut row_data, col, "col")?;
        reserve(&mut self.rows, row, "row")?;
        row_data.resize(col, None);
        row_data[col - 1] = value;
        self.rows.resize_with(row - 1, Vec::new);
        self.rows.push(row_data);
        Ok(())
    }

    /// Read the cell at (row, col). Positions outside the grid read as absent.
    pub fn get_cell(&self, row: usize, col: usize) -> Result<Cell> {
        validate_row_col(row, col)?;

        let value = self
            .rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .cloned()
            .flatten();
        Ok(Cell::new(row, col, value))
    }

    // ===== Row Operations =====

    /// Append a row to the end of the grid, returning its 1-based row number
    pub fn append_row<I, V>(&mut self, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let row: Row = values.into_iter().map(|v| Some(v.to_string())).collect();
        if row.is_empty() {
            return Err(SheetError::invalid("values must contain at least one item"));
        }

        self.rows.push(row);
        Ok(self.rows.len())
    }

    /// Get a copy of a row. Rows past the end come back empty.
    pub fn get_row(&self, row: usize) -> Result<Row> {
        validate_positive(row, "row")?;
        Ok(self.rows.get(row - 1).cloned().unwrap_or_default())
    }

    // ===== Column Operations =====

    /// Get one entry per existing row for the given column
    pub fn get_column(&self, col: usize) -> Result<Row> {
        validate_positive(col, "col")?;
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(col - 1).cloned().flatten())
            .collect())
    }

    // ===== Dimensions =====

    /// Number of rows currently present (0 when empty)
    #[must_use]
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row (0 when empty)
    #[must_use]
    pub fn max_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the grid is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the underlying rows
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Copy of the whole grid
    #[must_use]
    pub fn all_rows(&self) -> Vec<Row> {
        self.rows.clone()
    }

    /// Reset to an empty grid
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Render the grid as a fixed-width text table
    #[must_use]
    pub fn render_table(&self) -> String {
        render::render_table(&self.rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_table())
    }
}

pub(crate) fn validate_positive(value: usize, name: &str) -> Result<()> {
    if value < 1 {
        return Err(SheetError::invalid(format!(
            "{name} must be an integer >= 1 (got {value})"
        )));
    }
    Ok(())
}

pub(crate) fn validate_row_col(row: usize, col: usize) -> Result<()> {
    validate_positive(row, "row")?;
    validate_positive(col, "col")
}

/// Make room for `len` items, reporting an impossible allocation as an
/// invalid coordinate.
fn reserve<T>(items: &mut Vec<T>, len: usize, name: &str) -> Result<()> {
    items
        .try_reserve_exact(len.saturating_sub(items.len()))
        .map_err(|_| SheetError::invalid(format!("{name} {len} is too large")))
}
