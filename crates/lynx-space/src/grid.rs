//! Owned padded lattice slice.

use crate::error::SpaceError;
use crate::indexing::GridIndexing;

/// One lattice slice over the full padded extent.
///
/// Values are stored row-major in a single `Vec<f64>` of length
/// `(n + 2)^2`, padding included. The buffer length is fixed at
/// construction and always matches [`GridIndexing::cell_count`].
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedGrid {
    indexing: GridIndexing,
    cells: Vec<f64>,
}

impl PaddedGrid {
    /// A slice with every cell (padding included) set to zero.
    pub fn zeros(indexing: GridIndexing) -> Self {
        Self::filled(indexing, 0.0)
    }

    /// A slice with every cell set to `value`.
    pub fn filled(indexing: GridIndexing, value: f64) -> Self {
        Self {
            indexing,
            cells: vec![value; indexing.cell_count()],
        }
    }

    /// Wrap an existing flat buffer.
    ///
    /// Fails with [`SpaceError::LengthMismatch`] unless the buffer holds
    /// exactly `(n + 2)^2` cells.
    pub fn from_vec(indexing: GridIndexing, cells: Vec<f64>) -> Result<Self, SpaceError> {
        let expected = indexing.cell_count();
        if cells.len() != expected {
            return Err(SpaceError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { indexing, cells })
    }

    /// Build a slice from a table of rows covering the padded extent.
    ///
    /// Fails with [`SpaceError::ShapeMismatch`] if the row count or any
    /// row's width differs from `n + 2`.
    pub fn from_rows(indexing: GridIndexing, rows: Vec<Vec<f64>>) -> Result<Self, SpaceError> {
        let padded = indexing.padded_size();
        if rows.len() != padded {
            let width = rows.first().map_or(padded, Vec::len);
            return Err(SpaceError::ShapeMismatch {
                expected: (padded, padded),
                found: (rows.len(), width),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != padded) {
            return Err(SpaceError::ShapeMismatch {
                expected: (padded, padded),
                found: (rows.len(), bad.len()),
            });
        }
        let cells = rows.into_iter().flatten().collect();
        Ok(Self { indexing, cells })
    }

    /// The addressing policy of this slice.
    pub fn indexing(&self) -> GridIndexing {
        self.indexing
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the padded extent.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[self.indexing.index(row, col)]
    }

    /// Overwrite the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the padded extent.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.indexing.index(row, col);
        self.cells[i] = value;
    }

    /// The flat padded buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    /// The flat padded buffer, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Consume the slice, returning its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.cells
    }

    /// Iterate over the padded rows, ghost rows included.
    pub fn rows(&self) -> std::slice::Chunks<'_, f64> {
        self.cells.chunks(self.indexing.padded_size())
    }

    /// Iterate over the interior portion of each interior row.
    pub fn interior_rows(&self) -> impl Iterator<Item = &[f64]> {
        let range = self.indexing.interior_range();
        let (first, last) = (*range.start(), *range.end());
        self.rows()
            .skip(first)
            .take(last - first + 1)
            .map(move |row| &row[first..=last])
    }

    /// Iterate over interior values in row-major order.
    pub fn interior_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.interior_rows().flat_map(|row| row.iter().copied())
    }
}
