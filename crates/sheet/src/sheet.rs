use crate::cell::Cell;
use crate::csv::{write_rows_to_path, CsvStore};
use crate::error::Result;
use crate::grid::{Grid, Row};
use crate::store::{MemoryStore, SheetStore};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A sheet: a [`Grid`] plus the store that persists it.
///
/// All coordinates are 1-based. Mutations are applied to the in-memory grid
/// first and then forwarded to the store; if the store fails the local change
/// is kept and the error is returned.
pub struct Sheet {
    grid: Grid,
    store: Box<dyn SheetStore>,
}

impl Sheet {
    /// Create a new empty in-memory sheet
    #[must_use]
    pub fn new() -> Self {
        Sheet {
            grid: Grid::new(),
            store: Box::new(MemoryStore),
        }
    }

    /// Create a sheet backed by `store`, loading whatever the store holds
    pub fn with_store<S: SheetStore + 'static>(store: S) -> Result<Self> {
        Self::with_boxed_store(Box::new(store))
    }

    /// Create a sheet from an already boxed store
    pub fn with_boxed_store(mut store: Box<dyn SheetStore>) -> Result<Self> {
        let grid = store.load()?;
        debug!(
            store = %store.describe(),
            rows = grid.max_row(),
            cols = grid.max_column(),
            "opened sheet"
        );
        Ok(Sheet { grid, store })
    }

    /// Open (or create) a CSV-backed sheet at `path`
    pub fn open_csv<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::with_store(CsvStore::new(path)?)
    }

    /// Description of the backing store
    #[must_use]
    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    // ===== Cell Access =====

    /// Set the value at (row, col), growing the grid as needed
    pub fn set_cell<V: ToString>(&mut self, row: usize, col: usize, value: V) -> Result<()> {
        let value = value.to_string();
        self.grid.set_cell(row, col, &value)?;
        self.store.on_set_cell(&self.grid, row, col, &value)
    }

    /// Get the cell at (row, col); out-of-range positions read as absent
    pub fn get_cell(&self, row: usize, col: usize) -> Result<Cell> {
        self.grid.get_cell(row, col)
    }

    // ===== Row Operations =====

    /// Append a row and return its 1-based row number
    pub fn append_row<I, V>(&mut self, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        let row = self.grid.append_row(&values)?;
        self.store.on_append_row(&self.grid, row, &values)?;
        Ok(row)
    }

    /// Get a copy of a row; empty if `row` is past the last row
    pub fn get_row(&self, row: usize) -> Result<Row> {
        self.grid.get_row(row)
    }

    // ===== Column Operations =====

    /// Get a column, one entry per existing row
    pub fn get_column(&self, col: usize) -> Result<Row> {
        self.grid.get_column(col)
    }

    // ===== Dimensions =====

    #[must_use]
    pub fn get_max_row(&self) -> usize {
        self.grid.max_row()
    }

    #[must_use]
    pub fn get_max_column(&self) -> usize {
        self.grid.max_column()
    }

    /// Copy of every row, for display and inspection
    #[must_use]
    pub fn get_all_rows(&self) -> Vec<Row> {
        self.grid.all_rows()
    }

    /// Empty the sheet and its backing store
    pub fn clear(&mut self) -> Result<()> {
        self.grid.clear();
        self.store.on_clear(&self.grid)
    }

    // ===== Output =====

    /// Render the sheet as a fixed-width table
    #[must_use]
    pub fn render_table(&self) -> String {
        self.grid.render_table()
    }

    /// Print the table to standard output
    pub fn display(&self) -> Result<()> {
        self.write_table(io::stdout().lock())
    }

    /// Write the table to any writer
    pub fn write_table<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.render_table().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Export a snapshot of the sheet to a CSV file.
    ///
    /// Without a path the file goes to `<base_dir>/sheets/YYYYMMDD_HHMMSS.csv`.
    /// Relative paths are joined onto `base_dir`. Returns the written path.
    pub fn save_to_csv(&self, base_dir: &Path, path: Option<&Path>) -> Result<PathBuf> {
        let target = match path {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => base_dir.join(p),
            None => {
                let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                base_dir.join("sheets").join(format!("{timestamp}.csv"))
            }
        };

        write_rows_to_path(&target, self.grid.rows())?;
        info!(path = %target.display(), rows = self.grid.max_row(), "exported sheet");
        Ok(target)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("store", &self.store.describe())
            .field("grid", &self.grid)
            .finish()
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}
