//! Error types for the warm-start store.

use std::fmt;
use std::io;
use std::path::PathBuf;

use lynx_space::SpaceError;

/// Errors that can occur while loading or saving a snapshot table.
#[derive(Debug)]
pub enum StoreError {
    /// An I/O error occurred during read or write.
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// No table is stored under the key.
    Missing {
        /// The requested key.
        key: String,
    },
    /// The key cannot be mapped onto a table name.
    InvalidKey {
        /// The rejected key.
        key: String,
    },
    /// The table does not cover the padded grid.
    ShapeMismatch {
        /// Key of the table.
        key: String,
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Found `(rows, cols)`; `cols` is the first offending row width.
        found: (usize, usize),
    },
    /// A snapshot buffer does not form a padded grid.
    Slice {
        /// Key the buffer was to be saved under.
        key: String,
        /// Underlying error.
        source: SpaceError,
    },
    /// A cell is not a decimal number.
    Parse {
        /// Key of the table.
        key: String,
        /// 0-based row of the cell.
        row: usize,
        /// 0-based column of the cell.
        col: usize,
        /// The offending text.
        text: String,
    },
    /// The delimiter can appear inside a formatted number.
    InvalidDelimiter {
        /// The rejected delimiter.
        delimiter: char,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::Missing { key } => write!(f, "no table stored under '{key}'"),
            Self::InvalidKey { key } => write!(f, "'{key}' is not a valid table key"),
            Self::ShapeMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "table '{key}' is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::Slice { key, source } => write!(f, "cannot save '{key}': {source}"),
            Self::Parse {
                key,
                row,
                col,
                text,
            } => write!(
                f,
                "table '{key}' row {row} column {col}: {text:?} is not a number"
            ),
            Self::InvalidDelimiter { delimiter } => {
                write!(f, "delimiter {delimiter:?} collides with numeric content")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Slice { source, .. } => Some(source),
            _ => None,
        }
    }
}
