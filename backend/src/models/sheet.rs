//! Raw tabular sheet as read from a spreadsheet source.
//!
//! A [`RawSheet`] is a rectangular-ish grid of optional text cells. Row 0 is the
//! header row; rows may have different lengths, and any cell past the end of a
//! row reads as empty.

use serde::{Deserialize, Serialize};

/// Ordered grid of optional text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSheet {
    rows: Vec<Vec<Option<String>>>,
}

impl RawSheet {
    /// Create a sheet from already-normalized rows.
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Build a sheet from string rows, treating empty strings as empty cells.
    ///
    /// Convenient for CSV input and tests.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell = cell.as_ref();
                        if cell.is_empty() {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// The row at `index`, or `None` past the last row.
    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Text of the cell at (`row`, `col`); out-of-range cells are empty.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| cell_text(r, col))
    }
}

/// Text of cell `col` in `row`; out-of-range reads as empty.
pub fn cell_text(row: &[Option<String>], col: usize) -> Option<&str> {
    row.get(col).and_then(|c| c.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_strings_maps_empty_to_none() {
        let sheet = RawSheet::from_strings([vec!["", "Group A"], vec!["1 пара", ""]]);
        assert_eq!(sheet.cell(0, 0), None);
        assert_eq!(sheet.cell(0, 1), Some("Group A"));
        assert_eq!(sheet.cell(1, 0), Some("1 пара"));
        assert_eq!(sheet.cell(1, 1), None);
    }

    #[test]
    fn test_out_of_range_cells_are_empty() {
        let sheet = RawSheet::from_strings([vec!["a"], vec!["b", "c", "d"]]);
        assert_eq!(sheet.cell(0, 5), None);
        assert_eq!(sheet.cell(9, 0), None);
        assert_eq!(sheet.column_count(), 3);
        assert_eq!(sheet.row_count(), 2);
    }
}
