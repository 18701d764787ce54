//! Error types for lattice construction and fallible access.

use std::fmt;

/// Errors arising from lattice construction or checked access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// Attempted to construct a lattice with a zero-sized domain.
    EmptyDomain,
    /// The domain is too large to address.
    DimensionTooLarge {
        /// The requested domain size.
        value: u32,
        /// The largest supported domain size.
        max: u32,
    },
    /// A `(row, col)` lies outside the padded extent.
    CoordOutOfBounds {
        /// The offending row.
        row: usize,
        /// The offending column.
        col: usize,
        /// Padded side length (valid indices are `0..padded`).
        padded: usize,
    },
    /// A flat buffer has the wrong number of cells for the lattice.
    LengthMismatch {
        /// `padded * padded`.
        expected: usize,
        /// The buffer length supplied.
        actual: usize,
    },
    /// A row-structured table does not match the padded shape.
    ShapeMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Found `(rows, cols)`; `cols` is the width of the first row
        /// that differs, or the expected width if only the row count is off.
        found: (usize, usize),
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => write!(f, "domain size must be at least 1"),
            Self::DimensionTooLarge { value, max } => {
                write!(f, "domain size {value} exceeds maximum {max}")
            }
            Self::CoordOutOfBounds { row, col, padded } => {
                write!(
                    f,
                    "coordinate ({row}, {col}) out of bounds: [0, {padded}) x [0, {padded})"
                )
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer has {actual} cells, expected {expected}")
            }
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "table shape {}x{} does not match padded grid {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for SpaceError {}
