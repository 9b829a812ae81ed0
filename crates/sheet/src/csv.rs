use crate::error::Result;
use crate::grid::{Grid, Row};
use crate::store::SheetStore;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read CSV records into a grid. Empty fields become absent cells.
///
/// Blank lines are rows with no cells, so a gap row written by [`write_rows`]
/// comes back with length 0.
pub fn read_grid<R: Read>(mut reader: R) -> Result<Grid> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());

    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record = csv::StringRecord::new();
    // Byte offset just past the previous record's line terminator
    let mut line_start = 0;
    while csv_reader.read_record(&mut record)? {
        let end = usize::try_from(csv_reader.position().byte()).unwrap_or(data.len());
        let skipped = blank_lines(&data[line_start.min(end)..end]);
        records.extend(std::iter::repeat_with(Vec::new).take(skipped));
        records.push(record.iter().map(str::to_string).collect());
        line_start = past_terminator(&data, end);
    }
    let trailing = blank_lines(&data[line_start.min(data.len())..]);
    records.extend(std::iter::repeat_with(Vec::new).take(trailing));

    Ok(Grid::from_records(records))
}

/// Number of empty lines at the start of `bytes`.
fn blank_lines(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .filter(|b| **b == b'\n')
        .count()
}

/// Offset after the line terminator ending at or following `end`.
fn past_terminator(data: &[u8], end: usize) -> usize {
    if end > 0 && data.get(end - 1) == Some(&b'\n') {
        return end;
    }
    match data.get(end..) {
        Some([b'\r', b'\n', ..]) => end + 2,
        Some([b'\n' | b'\r', ..]) => end + 1,
        _ => end,
    }
}

/// Write rows as CSV. Absent cells are written as empty fields and a row
/// with no cells as a blank line.
pub fn write_rows<W: Write>(mut writer: W, rows: &[Row]) -> Result<()> {
    for row in rows {
        match row.as_slice() {
            [] => {
                writer.write_all(b"\n")?;
            }
            // A lone empty field is quoted so it is not read back as a blank line
            [only] if only.as_deref().unwrap_or("").is_empty() => {
                writer.write_all(b"\"\"\n")?;
            }
            _ => {
                let mut csv_writer = csv::WriterBuilder::new()
                    .flexible(true)
                    .from_writer(Vec::new());
                csv_writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
                let buffer = csv_writer
                    .into_inner()
                    .map_err(|e| std::io::Error::from(e.into_error()))?;
                writer.write_all(&buffer)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write rows to `path`, creating parent directories as needed.
pub fn write_rows_to_path(path: &Path, rows: &[Row]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_rows(BufWriter::new(file), rows)
}

/// Store that mirrors the whole grid to a CSV file after every mutation.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store for `path`, creating its parent directory.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(CsvStore { path })
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, grid: &Grid) -> Result<()> {
        debug!(path = %self.path.display(), rows = grid.max_row(), "rewriting csv");
        let file = File::create(&self.path)?;
        write_rows(BufWriter::new(file), grid.rows())
    }
}

impl SheetStore for CsvStore {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load(&mut self) -> Result<Grid> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "csv file not found, starting empty");
            return Ok(Grid::new());
        }
        let file = File::open(&self.path)?;
        let grid = read_grid(BufReader::new(file))?;
        debug!(path = %self.path.display(), rows = grid.max_row(), "loaded csv");
        Ok(grid)
    }

    fn on_set_cell(&mut self, grid: &Grid, _row: usize, _col: usize, _value: &str) -> Result<()> {
        self.flush(grid)
    }

    fn on_append_row(&mut self, grid: &Grid, _row: usize, _values: &[String]) -> Result<()> {
        self.flush(grid)
    }

    fn on_clear(&mut self, grid: &Grid) -> Result<()> {
        self.flush(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[Option<&str>]]) -> Vec<Row> {
        data.iter()
            .map(|r| r.iter().map(|v| v.map(str::to_string)).collect())
            .collect()
    }

    fn to_string(rows: &[Row]) -> String {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, rows).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_absent_as_empty_field() {
        let data = rows(&[&[Some("a"), None, Some("c")], &[None, Some("b")]]);
        assert_eq!(to_string(&data), "a,,c\n,b\n");
    }

    #[test]
    fn test_write_quotes_embedded_delimiters() {
        let data = rows(&[&[Some("x,y"), Some("line\nbreak"), Some("say \"hi\"")]]);
        assert_eq!(
            to_string(&data),
            "\"x,y\",\"line\nbreak\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_read_ragged_records() {
        let grid = read_grid("a,b,c\nd\n,e\n".as_bytes()).unwrap();
        assert_eq!(grid.max_row(), 3);
        assert_eq!(grid.max_column(), 3);
        assert_eq!(grid.get_row(2).unwrap(), vec![Some("d".to_string())]);
        assert_eq!(grid.get_row(3).unwrap(), vec![None, Some("e".to_string())]);
    }

    #[test]
    fn test_empty_row_written_as_blank_line() {
        let data = rows(&[&[], &[Some("x")]]);
        assert_eq!(to_string(&data), "\nx\n");
    }

    #[test]
    fn test_empty_row_reloads_with_no_cells() {
        let data = rows(&[&[], &[None], &[Some("x")], &[]]);
        let written = to_string(&data);
        assert_eq!(written, "\n\"\"\nx\n\n");

        let grid = read_grid(written.as_bytes()).unwrap();
        assert_eq!(grid.max_row(), 4);
        assert!(grid.get_row(1).unwrap().is_empty());
        assert_eq!(grid.get_row(2).unwrap(), vec![None]);
        assert_eq!(grid.get_cell(3, 1).unwrap().as_str(), Some("x"));
        assert!(grid.get_row(4).unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_between_records() {
        let grid = read_grid("a\r\n\r\n\r\nb\r\n".as_bytes()).unwrap();
        assert_eq!(grid.max_row(), 4);
        assert!(grid.get_row(2).unwrap().is_empty());
        assert!(grid.get_row(3).unwrap().is_empty());
        assert_eq!(grid.get_cell(4, 1).unwrap().as_str(), Some("b"));
    }

    #[test]
    fn test_quoted_newline_is_not_a_blank_line() {
        let grid = read_grid("\"a\n\"\nb\n".as_bytes()).unwrap();
        assert_eq!(grid.max_row(), 2);
        assert_eq!(grid.get_cell(1, 1).unwrap().as_str(), Some("a\n"));
    }

    #[test]
    fn test_empty_input() {
        assert!(read_grid("".as_bytes()).unwrap().is_empty());
    }
}
