//! Delimited text encoding of padded slices.
//!
//! One line per padded row, cells separated by a single delimiter
//! character. Values are written with `f64`'s shortest round-trip
//! formatting, so decoding an encoded slice reproduces it bit for bit
//! (NaN payloads aside). Surrounding whitespace of each cell is ignored
//! on decode, as are blank lines at the end of the table.

use std::io::{BufRead, Write};

use lynx_space::{GridIndexing, PaddedGrid};

use crate::error::StoreError;

/// Default column separator.
pub const DEFAULT_DELIMITER: char = '|';

/// Encoder/decoder for one delimiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableCodec {
    delimiter: char,
}

impl Default for TableCodec {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl TableCodec {
    /// A codec for `delimiter`.
    ///
    /// Rejects characters that can occur in a formatted or parsed `f64`
    /// (digits, letters, sign, decimal point) and whitespace.
    pub fn new(delimiter: char) -> Result<Self, StoreError> {
        if delimiter.is_ascii_alphanumeric()
            || delimiter.is_whitespace()
            || matches!(delimiter, '.' | '-' | '+')
        {
            return Err(StoreError::InvalidDelimiter { delimiter });
        }
        Ok(Self { delimiter })
    }

    /// The column separator.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Write every padded row of `grid`.
    pub fn encode<W: Write>(&self, mut out: W, grid: &PaddedGrid) -> std::io::Result<()> {
        let mut sep = [0u8; 4];
        let sep = self.delimiter.encode_utf8(&mut sep).as_bytes();
        for row in grid.rows() {
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    out.write_all(sep)?;
                }
                write!(out, "{v}")?;
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Encode into a `String`.
    pub fn encode_to_string(&self, grid: &PaddedGrid) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.encode(&mut buf, grid);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Parse a table for `indexing`, reporting errors against `key`.
    ///
    /// The whole table is parsed and its shape checked before a grid is
    /// returned. I/O errors are attributed to `key` as a path.
    pub fn decode<R: BufRead>(
        &self,
        input: R,
        key: &str,
        indexing: GridIndexing,
    ) -> Result<PaddedGrid, StoreError> {
        let padded = indexing.padded_size();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(padded);
        for (r, line) in input.lines().enumerate() {
            let line = line.map_err(|source| StoreError::Io {
                path: key.into(),
                source,
            })?;
            if line.trim().is_empty() {
                rows.push(Vec::new());
                continue;
            }
            let row = line
                .split(self.delimiter)
                .enumerate()
                .map(|(c, cell)| {
                    let text = cell.trim();
                    text.parse::<f64>().map_err(|_| StoreError::Parse {
                        key: key.to_string(),
                        row: r,
                        col: c,
                        text: text.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push(row);
        }
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }

        let width = rows
            .iter()
            .map(Vec::len)
            .find(|&w| w != padded)
            .unwrap_or(padded);
        if rows.len() != padded || width != padded {
            return Err(StoreError::ShapeMismatch {
                key: key.to_string(),
                expected: (padded, padded),
                found: (rows.len(), width),
            });
        }
        PaddedGrid::from_rows(indexing, rows).map_err(|_| StoreError::ShapeMismatch {
            key: key.to_string(),
            expected: (padded, padded),
            found: (padded, width),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_test_utils::grid_from_fn;
    use proptest::prelude::*;

    fn ix(n: u32) -> GridIndexing {
        GridIndexing::new(n).unwrap()
    }

    #[test]
    fn encodes_padded_rows() {
        let g = grid_from_fn(1, |_, _| 0.5);
        let text = TableCodec::default().encode_to_string(&g);
        assert_eq!(text, "0|0|0\n0|0.5|0\n0|0|0\n");
    }

    #[test]
    fn custom_delimiter() {
        let codec = TableCodec::new(',').unwrap();
        let g = grid_from_fn(1, |_, _| 1.25);
        let text = codec.encode_to_string(&g);
        assert_eq!(text.lines().nth(1), Some("0,1.25,0"));
        assert_eq!(codec.decode(text.as_bytes(), "prey", ix(1)).unwrap(), g);
    }

    #[test]
    fn rejects_numeric_delimiters() {
        for d in ['0', '.', '-', '+', 'e', 'E', 'i', 'n', ' ', '\t'] {
            assert!(
                matches!(
                    TableCodec::new(d),
                    Err(StoreError::InvalidDelimiter { delimiter }) if delimiter == d
                ),
                "{d:?}"
            );
        }
    }

    #[test]
    fn decode_tolerates_spaces_and_trailing_blank_lines() {
        let text = " 1 | 2 | 3 \n4|5|6\n7|8|9\n\n\n";
        let g = TableCodec::default().decode(text.as_bytes(), "prey", ix(1)).unwrap();
        assert_eq!(g.get(1, 1), 5.0);
        assert_eq!(g.get(2, 0), 7.0);
    }

    #[test]
    fn decode_reports_row_count_mismatch() {
        let text = "1|2|3\n4|5|6\n";
        match TableCodec::default().decode(text.as_bytes(), "prey", ix(1)) {
            Err(StoreError::ShapeMismatch {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "prey");
                assert_eq!(expected, (3, 3));
                assert_eq!(found, (2, 3));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn decode_reports_ragged_row() {
        let text = "1|2|3\n4|5\n7|8|9\n";
        match TableCodec::default().decode(text.as_bytes(), "predator", ix(1)) {
            Err(StoreError::ShapeMismatch { found, .. }) => assert_eq!(found, (3, 2)),
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn decode_reports_bad_cell() {
        let text = "1|2|3\n4|x|6\n7|8|9\n";
        match TableCodec::default().decode(text.as_bytes(), "prey", ix(1)) {
            Err(StoreError::Parse { row, col, text, .. }) => {
                assert_eq!((row, col), (1, 1));
                assert_eq!(text, "x");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_inside_table_is_a_shape_error() {
        let text = "1|2|3\n\n7|8|9\n";
        assert!(matches!(
            TableCodec::default().decode(text.as_bytes(), "prey", ix(1)),
            Err(StoreError::ShapeMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn encode_decode_is_exact(
            n in 1u32..6,
            values in prop::collection::vec(any::<f64>().prop_filter("finite", |v| v.is_finite()), 64),
        ) {
            let g = grid_from_fn(n, |r, c| values[(r * 7 + c) % 64]);
            let codec = TableCodec::default();
            let text = codec.encode_to_string(&g);
            let back = codec.decode(text.as_bytes(), "prey", ix(n)).unwrap();
            prop_assert_eq!(back, g);
        }
    }
}
