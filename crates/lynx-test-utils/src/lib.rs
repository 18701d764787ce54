//! Test utilities and mock types for Lynx development.
//!
//! Provides mock implementations of core traits ([`FieldReader`],
//! [`FieldWriter`], [`SnapshotAccess`]), grid builders, and the
//! propagator fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;

use lynx_core::{FieldId, FieldReader, FieldWriter, SnapshotAccess, TickId};
use lynx_space::{GridIndexing, PaddedGrid};

/// Build an `n x n` padded grid whose interior is `f(row, col)` and whose
/// ghost ring is zero. Coordinates are padded (`1..=n`).
pub fn grid_from_fn(n: u32, f: impl Fn(usize, usize) -> f64) -> PaddedGrid {
    let ix = GridIndexing::new(n).expect("test domain size must be valid");
    let mut g = PaddedGrid::zeros(ix);
    for (r, c) in ix.interior() {
        g.set(r, c, f(r, c));
    }
    g
}

/// Mock implementation of [`FieldReader`].
///
/// Pre-populate fields with [`set_field`](MockFieldReader::set_field)
/// before passing to code under test.
#[derive(Default)]
pub struct MockFieldReader {
    fields: IndexMap<FieldId, Vec<f64>>,
}

impl MockFieldReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a field with data for testing.
    pub fn set_field(&mut self, field: FieldId, data: Vec<f64>) {
        self.fields.insert(field, data);
    }

    /// Pre-populate a field from a padded grid.
    pub fn set_grid(&mut self, field: FieldId, grid: &PaddedGrid) {
        self.set_field(field, grid.as_slice().to_vec());
    }
}

impl FieldReader for MockFieldReader {
    fn read(&self, field: FieldId) -> Option<&[f64]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }
}

/// Mock implementation of [`FieldWriter`].
///
/// Pre-allocate field buffers with [`add_field`](MockFieldWriter::add_field),
/// then pass to code under test. Inspect results with
/// [`get_field`](MockFieldWriter::get_field).
#[derive(Default)]
pub struct MockFieldWriter {
    fields: IndexMap<FieldId, Vec<f64>>,
}

impl MockFieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate a field buffer with the given size, initialized to zero.
    pub fn add_field(&mut self, field: FieldId, size: usize) {
        self.fields.insert(field, vec![0.0; size]);
    }

    /// Read back the current field data for test assertions.
    pub fn get_field(&self, field: FieldId) -> Option<&[f64]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }
}

impl FieldWriter for MockFieldWriter {
    fn write(&mut self, field: FieldId) -> Option<&mut [f64]> {
        self.fields.get_mut(&field).map(|v| v.as_mut_slice())
    }
}

/// Mock snapshot implementing [`SnapshotAccess`].
pub struct MockSnapshot {
    fields: IndexMap<FieldId, Vec<f64>>,
    tick: TickId,
}

impl MockSnapshot {
    pub fn new(tick: TickId) -> Self {
        Self {
            fields: IndexMap::new(),
            tick,
        }
    }

    /// Pre-populate a field with data for testing.
    pub fn set_field(&mut self, field: FieldId, data: Vec<f64>) {
        self.fields.insert(field, data);
    }

    /// Returns the number of fields in the snapshot.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl SnapshotAccess for MockSnapshot {
    fn read_field(&self, field: FieldId) -> Option<&[f64]> {
        self.fields.get(&field).map(|v| v.as_slice())
    }

    fn tick_id(&self) -> TickId {
        self.tick
    }
}
