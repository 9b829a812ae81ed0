//! Demo of the grid engine and the CSV-backed store
//!
//! Run with: cargo run --example sheet_demo -p simplesheet-sheet

use simplesheet_sheet::Sheet;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sheet Demo ===\n");

    // In-memory sheet
    let mut sheet = Sheet::new();
    sheet.append_row(["日付", "名前", "出欠"])?;
    sheet.append_row(["12/1", "山田", "出席"])?;
    sheet.append_row(["12/1", "Smith", "absent"])?;
    sheet.set_cell(5, 2, "growth")?;

    println!(
        "Sheet has {} rows, {} cols",
        sheet.get_max_row(),
        sheet.get_max_column()
    );
    sheet.display()?;

    // CSV-backed sheet in the platform temp directory
    let csv_path = env::temp_dir().join("simplesheet_demo").join("attendance.csv");
    {
        let mut csv_sheet = Sheet::open_csv(&csv_path)?;
        csv_sheet.clear()?;
        for row in sheet.get_all_rows() {
            let values: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
            if !values.is_empty() {
                csv_sheet.append_row(values)?;
            }
        }
    }

    let reloaded = Sheet::open_csv(&csv_path)?;
    println!("\nReloaded from {}:", csv_path.display());
    reloaded.display()?;

    Ok(())
}
