//! Row-wise collapsing of a text matrix, as used for INFO-style columns.

use crate::error::{Result, SerializeError};

/// Column-major matrix of optional strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextMatrix {
    rows: usize,
    cells: Vec<Option<String>>,
}

impl TextMatrix {
    /// Fails unless `cells.len()` is a whole number of columns of `rows`.
    pub fn new(rows: usize, cells: Vec<Option<String>>) -> Result<Self> {
        let filled = if rows == 0 {
            cells.is_empty()
        } else {
            cells.len() % rows == 0
        };
        if !filled {
            return Err(SerializeError::RaggedMatrix {
                rows,
                cells: cells.len(),
            });
        }
        Ok(Self { rows, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn row(&self, r: usize) -> impl Iterator<Item = Option<&str>> {
        self.cells
            .iter()
            .skip(r)
            .step_by(self.rows.max(1))
            .map(Option::as_deref)
    }
}

/// Concatenate the present cells of each row with `separator`.
pub fn collapse_rows(matrix: &TextMatrix, separator: char) -> Vec<String> {
    (0..matrix.rows())
        .map(|r| {
            let mut collapsed = String::new();
            for (n, cell) in matrix.row(r).flatten().enumerate() {
                if n > 0 {
                    collapsed.push(separator);
                }
                collapsed.push_str(cell);
            }
            collapsed
        })
        .collect()
}
