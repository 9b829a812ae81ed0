use std::fmt;

/// A single addressed cell as returned by a read.
///
/// Cells are snapshots: they are produced by [`crate::Sheet::get_cell`] and
/// never written back into the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: Option<String>,
}

impl Cell {
    #[must_use]
    pub fn new(row: usize, col: usize, value: Option<String>) -> Self {
        Cell { row, col, value }
    }

    /// The value as a string slice, if the cell holds one
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Check if the cell was never written (or lies outside the grid)
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// A1-style address of this cell
    #[must_use]
    pub fn address(&self) -> String {
        crate::a1_notation::to_a1_notation(self.row, self.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cell() {
        let cell = Cell::new(3, 4, None);
        assert!(cell.is_absent());
        assert_eq!(cell.as_str(), None);
        assert_eq!(cell.to_string(), "");
        assert_eq!(cell.address(), "D3");
    }

    #[test]
    fn test_empty_string_is_not_absent() {
        let cell = Cell::new(1, 1, Some(String::new()));
        assert!(!cell.is_absent());
        assert_eq!(cell.as_str(), Some(""));
    }
}
