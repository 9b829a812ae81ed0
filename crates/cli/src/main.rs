//! # simplesheet-cli
//!
//! Command-line interface for reading and editing simplesheet grids.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplesheet_core::{
    expand_home, open_sheet, resolve_path, Credentials, OpenOptions, Sheet, SheetConfig, SheetMode,
};
use simplesheet_sheet::a1_notation::{parse_a1, to_a1_notation};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// sheet - 1-based grid editing on CSV files or Google Sheets
#[derive(Parser)]
#[command(name = "sheet")]
#[command(author, version, about = "Edit a grid of cells stored in CSV or Google Sheets", long_about = None)]
struct Cli {
    /// Use the Google Sheets backend instead of a local CSV file
    #[arg(long, global = true)]
    online: bool,

    /// CSV file for local mode (relative to the base directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    path: Option<PathBuf>,

    /// Spreadsheet id for online mode (overrides GOOGLE_SPREADSHEET_ID)
    #[arg(long, global = true)]
    spreadsheet_id: Option<String>,

    /// Worksheet title for online mode (overrides GOOGLE_WORKSHEET_NAME)
    #[arg(short, long, global = true)]
    worksheet: Option<String>,

    /// Service-account key file for online mode
    #[arg(long, value_name = "FILE", global = true)]
    credentials: Option<PathBuf>,

    /// Directory that relative paths resolve against
    #[arg(long, value_name = "DIR", global = true)]
    base_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print the whole sheet as a table
    Show,
    /// Print one cell
    Get { row: usize, col: usize },
    /// Write one cell
    Set { row: usize, col: usize, value: String },
    /// Read or write one cell addressed in A1 notation
    Cell {
        /// Cell reference such as `B3`
        reference: String,
        /// Value to store; prints the cell when omitted
        value: Option<String>,
    },
    /// Append a row after the last one
    Append {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Print one row
    Row { row: usize },
    /// Print one column
    Column { col: usize },
    /// Remove every cell
    Clear,
    /// Save a CSV snapshot (defaults to sheets/YYYYMMDD_HHMMSS.csv)
    Export { path: Option<PathBuf> },
    /// Write 12月 into A1 and print the sheet
    Demo,
}

fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let base_dir = match &cli.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let options = open_options(&cli, &base_dir);
    let config = SheetConfig::from_env();

    let mut sheet = open_sheet(&options, &config).context("Failed to open sheet")?;
    debug!(store = %sheet.store_description(), "sheet opened");

    let stdout = io::stdout();
    run(&mut sheet, &cli.command, &base_dir, &mut stdout.lock())
}

/// Load `.env` from the working directory, falling back to `./src/.env`.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path(Path::new("src").join(".env"));
    }
}

fn open_options(cli: &Cli, base_dir: &Path) -> OpenOptions {
    let mode = if cli.online {
        SheetMode::Online
    } else {
        SheetMode::Local
    };
    let mut options = OpenOptions::new(mode).with_base_dir(base_dir);

    if let Some(path) = &cli.path {
        options = options.with_path(path.clone());
    }
    if let Some(id) = &cli.spreadsheet_id {
        options = options.with_spreadsheet_id(id.clone());
    }
    if let Some(worksheet) = &cli.worksheet {
        options = options.with_worksheet(worksheet.clone());
    }
    if let Some(file) = &cli.credentials {
        let file = expand_home(file, dirs::home_dir().as_deref());
        options = options.with_credentials(Credentials::File(resolve_path(base_dir, file)));
    }
    options
}

/// Execute one subcommand against an open sheet.
fn run<W: Write>(sheet: &mut Sheet, command: &Command, base_dir: &Path, out: &mut W) -> Result<()> {
    match command {
        Command::Show => sheet.write_table(&mut *out)?,
        Command::Get { row, col } => {
            let cell = sheet.get_cell(*row, *col)?;
            writeln!(out, "{}", cell.as_str().unwrap_or_default())?;
        }
        Command::Set { row, col, value } => {
            sheet.set_cell(*row, *col, value)?;
            writeln!(out, "{} = {value}", to_a1_notation(*row, *col))?;
        }
        Command::Cell { reference, value } => {
            let (row, col) = parse_a1(reference)?;
            match value {
                Some(value) => {
                    sheet.set_cell(row, col, value)?;
                    writeln!(out, "{} = {value}", to_a1_notation(row, col))?;
                }
                None => {
                    let cell = sheet.get_cell(row, col)?;
                    writeln!(out, "{}", cell.as_str().unwrap_or_default())?;
                }
            }
        }
        Command::Append { values } => {
            let row = sheet.append_row(values)?;
            writeln!(out, "appended row {row}")?;
        }
        Command::Row { row } => {
            let values = sheet.get_row(*row)?;
            writeln!(out, "{}", join_values(&values))?;
        }
        Command::Column { col } => {
            for value in sheet.get_column(*col)? {
                writeln!(out, "{}", value.as_deref().unwrap_or_default())?;
            }
        }
        Command::Clear => {
            sheet.clear()?;
            writeln!(out, "cleared")?;
        }
        Command::Export { path } => {
            let written = sheet
                .save_to_csv(base_dir, path.as_deref())
                .context("Failed to export sheet")?;
            writeln!(out, "saved {}", written.display())?;
        }
        Command::Demo => {
            sheet.set_cell(1, 1, "12月")?;
            sheet.write_table(&mut *out)?;
        }
    }
    Ok(())
}

/// Tab-separated row values with absent cells left blank.
fn join_values(values: &[Option<String>]) -> String {
    values
        .iter()
        .map(|v| v.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(sheet: &mut Sheet, command: Command) -> Result<String> {
        let dir = tempfile::tempdir()?;
        let mut out = Vec::new();
        run(sheet, &command, dir.path(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    // ========================================================================
    // argument parsing
    // ========================================================================

    #[test]
    fn test_parse_set() {
        let cli = Cli::parse_from(["sheet", "set", "2", "3", "hello"]);
        assert_eq!(
            cli.command,
            Command::Set {
                row: 2,
                col: 3,
                value: "hello".to_string()
            }
        );
        assert!(!cli.online);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "sheet",
            "show",
            "--online",
            "--spreadsheet-id",
            "doc-1",
            "-w",
            "出欠",
        ]);
        assert!(cli.online);
        assert_eq!(cli.spreadsheet_id.as_deref(), Some("doc-1"));
        assert_eq!(cli.worksheet.as_deref(), Some("出欠"));
        assert_eq!(cli.command, Command::Show);
    }

    #[test]
    fn test_parse_rejects_negative_row() {
        assert!(Cli::try_parse_from(["sheet", "get", "-1", "1"]).is_err());
    }

    #[test]
    fn test_append_requires_values() {
        assert!(Cli::try_parse_from(["sheet", "append"]).is_err());
    }

    #[test]
    fn test_open_options_from_flags() {
        let cli = Cli::parse_from([
            "sheet",
            "--credentials",
            "key.json",
            "--path",
            "data/a.csv",
            "show",
        ]);
        let options = open_options(&cli, Path::new("/srv/app"));

        assert_eq!(options.mode, SheetMode::Local);
        assert_eq!(options.path, Some(PathBuf::from("data/a.csv")));
        assert_eq!(
            options.credentials,
            Some(Credentials::File(PathBuf::from("/srv/app/key.json")))
        );
    }

    // ========================================================================
    // command execution
    // ========================================================================

    #[test]
    fn test_demo_renders_wide_cell() {
        let mut sheet = Sheet::new();
        let output = run_to_string(&mut sheet, Command::Demo).unwrap();
        assert_eq!(output, "+------+\n| 12月 |\n+------+\n+------+\n");
    }

    #[test]
    fn test_open_options_expand_home_in_credentials() {
        let cli = Cli::parse_from(["sheet", "--credentials", "~/key.json", "show"]);
        let options = open_options(&cli, Path::new("/srv/app"));

        let expected = match dirs::home_dir() {
            Some(home) => home.join("key.json"),
            None => PathBuf::from("/srv/app/~/key.json"),
        };
        assert_eq!(options.credentials, Some(Credentials::File(expected)));
    }

    #[test]
    fn test_huge_row_is_an_error() {
        let cli = Cli::parse_from(["sheet", "set", "18446744073709551615", "1", "x"]);
        let mut sheet = Sheet::new();
        let err = run_to_string(&mut sheet, cli.command).unwrap_err();
        assert!(err.to_string().contains("Invalid parameter"));
        assert_eq!(sheet.get_max_row(), 0);
    }

    #[test]
    fn test_get_absent_cell_prints_blank_line() {
        let mut sheet = Sheet::new();
        let output = run_to_string(&mut sheet, Command::Get { row: 4, col: 4 }).unwrap();
        assert_eq!(output, "\n");
    }

    #[test]
    fn test_zero_coordinate_is_an_error() {
        let mut sheet = Sheet::new();
        let err = run_to_string(&mut sheet, Command::Get { row: 0, col: 1 }).unwrap_err();
        assert!(err.to_string().contains("Invalid parameter"));
    }

    #[test]
    fn test_cell_reference_round_trip() {
        let mut sheet = Sheet::new();
        let set = Command::Cell {
            reference: "b3".to_string(),
            value: Some("x".to_string()),
        };
        assert_eq!(run_to_string(&mut sheet, set).unwrap(), "B3 = x\n");
        assert_eq!(sheet.get_cell(3, 2).unwrap().as_str(), Some("x"));

        let get = Command::Cell {
            reference: "B3".to_string(),
            value: None,
        };
        assert_eq!(run_to_string(&mut sheet, get).unwrap(), "x\n");
    }

    #[test]
    fn test_row_and_column_output() {
        let mut sheet = Sheet::new();
        sheet.append_row(["a", "b"]).unwrap();
        sheet.set_cell(2, 2, "c").unwrap();

        let row = run_to_string(&mut sheet, Command::Row { row: 1 }).unwrap();
        assert_eq!(row, "a\tb\n");
        let col = run_to_string(&mut sheet, Command::Column { col: 2 }).unwrap();
        assert_eq!(col, "b\nc\n");
        let col = run_to_string(&mut sheet, Command::Column { col: 1 }).unwrap();
        assert_eq!(col, "a\n\n");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sheet = Sheet::new();
        sheet.append_row(["id", "name"]).unwrap();

        let mut out = Vec::new();
        let command = Command::Export {
            path: Some(PathBuf::from("out/snapshot.csv")),
        };
        run(&mut sheet, &command, dir.path(), &mut out).unwrap();

        let written = std::fs::read_to_string(dir.path().join("out/snapshot.csv")).unwrap();
        assert_eq!(written, "id,name\n");
    }
}
