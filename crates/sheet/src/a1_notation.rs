use crate::error::{Result, SheetError};

/// Parse A1-style cell notation (e.g., "A1", "Z99", "AA1")
/// Returns (row, column) as 1-based indices
pub fn parse_a1(notation: &str) -> Result<(usize, usize)> {
    if notation.is_empty() {
        return Err(SheetError::InvalidCellNotation(notation.to_string()));
    }

    let notation = notation.trim().to_uppercase();

    // Find where letters end and numbers begin
    let Some(split_pos) = notation.find(|c: char| c.is_ascii_digit()) else {
        return Err(SheetError::InvalidCellNotation(notation));
    };
    if split_pos == 0 {
        return Err(SheetError::InvalidCellNotation(notation));
    }

    let (col_part, row_part) = notation.split_at(split_pos);
    let col = parse_column_letters(col_part)?;
    let row = row_part
        .parse::<usize>()
        .map_err(|_| SheetError::InvalidCellNotation(notation.clone()))?;

    if row == 0 {
        return Err(SheetError::InvalidCellNotation(notation));
    }

    Ok((row, col))
}

/// Convert column letters to a 1-based column index
/// A=1, B=2, ... Z=26, AA=27, AB=28, ...
fn parse_column_letters(col_str: &str) -> Result<usize> {
    let mut col: usize = 0;

    for b in col_str.bytes() {
        if !b.is_ascii_uppercase() {
            return Err(SheetError::InvalidCellNotation(col_str.to_string()));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add((b - b'A') as usize + 1))
            .ok_or_else(|| SheetError::InvalidCellNotation(col_str.to_string()))?;
    }

    Ok(col)
}

/// Convert a 1-based column index to column letters
/// 1=A, 2=B, ... 26=Z, 27=AA, 28=AB, ...
///
/// Column 0 has no letters and yields an empty string.
pub fn column_index_to_letters(mut col: usize) -> String {
    let mut result = String::new();

    while col > 0 {
        col -= 1;
        result.insert(0, ((col % 26) as u8 + b'A') as char);
        col /= 26;
    }

    result
}

/// Convert 1-based (row, col) to A1 notation
/// (1, 1) = "A1", (1, 2) = "B1", etc.
pub fn to_a1_notation(row: usize, col: usize) -> String {
    format!("{}{}", column_index_to_letters(col), row)
}
