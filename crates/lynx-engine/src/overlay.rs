//! Staged write buffers and overlay readers for tick execution.
//!
//! Each tick writes into [`StagedBuffers`], one zero-filled buffer per
//! pipeline output. A propagator may only write its declared outputs.
//!
//! Reads of staged fields are served from [`StagedFieldCache`], refilled
//! before each propagator, because the staged buffers are mutably
//! borrowed by the propagator's `StepContext` while it runs.
//!
//! [`OverlayReader`] routes each `(propagator, field)` read to the
//! previous slice or the staged cache based on the
//! [`ReadResolutionPlan`](lynx_propagator::ReadResolutionPlan).

use indexmap::IndexMap;
use lynx_core::{FieldId, FieldReader, FieldSet, FieldWriter};
use lynx_propagator::ReadSource;

// ── StagedBuffers ────────────────────────────────────────────────

/// Write buffers for every field produced by the pipeline.
pub(crate) struct StagedBuffers {
    buffers: IndexMap<FieldId, Vec<f64>>,
    writable: FieldSet,
}

impl StagedBuffers {
    /// Allocate one buffer of `cells` values per field.
    pub(crate) fn new(fields: impl IntoIterator<Item = FieldId>, cells: usize) -> Self {
        Self {
            buffers: fields.into_iter().map(|f| (f, vec![0.0; cells])).collect(),
            writable: FieldSet::empty(),
        }
    }

    /// Zero every buffer and revoke write access.
    pub(crate) fn begin_tick(&mut self) {
        for buf in self.buffers.values_mut() {
            buf.fill(0.0);
        }
        self.writable = FieldSet::empty();
    }

    /// Grant write access to exactly `fields`.
    pub(crate) fn restrict(&mut self, fields: FieldSet) {
        self.writable = fields;
    }

    /// Read a staged buffer regardless of write access.
    pub(crate) fn read(&self, field: FieldId) -> Option<&[f64]> {
        self.buffers.get(&field).map(Vec::as_slice)
    }
}

impl FieldWriter for StagedBuffers {
    fn write(&mut self, field: FieldId) -> Option<&mut [f64]> {
        if !self.writable.contains(field) {
            return None;
        }
        self.buffers.get_mut(&field).map(Vec::as_mut_slice)
    }
}

// ── StagedFieldCache ─────────────────────────────────────────────

/// Copies of staged fields for a single propagator's overlay reads.
///
/// Cleared and refilled between propagators. `None` marks a stale slot
/// so buffers are reused across ticks.
pub(crate) struct StagedFieldCache {
    entries: IndexMap<FieldId, Option<Vec<f64>>>,
}

impl StagedFieldCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Mark all entries stale (keeps allocations).
    pub(crate) fn clear(&mut self) {
        for v in self.entries.values_mut() {
            *v = None;
        }
    }

    /// Insert (or replace) a field's data.
    pub(crate) fn insert(&mut self, field: FieldId, data: &[f64]) {
        let slot = self.entries.entry(field).or_insert(None);
        let buf = slot.get_or_insert_with(|| Vec::with_capacity(data.len()));
        buf.clear();
        buf.extend_from_slice(data);
    }

    /// Refill from `staged` with every field `routes` marks as staged.
    pub(crate) fn refill(
        &mut self,
        routes: &IndexMap<FieldId, ReadSource>,
        staged: &StagedBuffers,
    ) {
        self.clear();
        for (&field, source) in routes {
            if let ReadSource::Staged { .. } = source {
                if let Some(data) = staged.read(field) {
                    self.insert(field, data);
                }
            }
        }
    }
}

impl FieldReader for StagedFieldCache {
    fn read(&self, field: FieldId) -> Option<&[f64]> {
        self.entries.get(&field).and_then(|v| v.as_deref())
    }
}

// ── OverlayReader ────────────────────────────────────────────────

/// Per-propagator [`FieldReader`] routing reads per the read plan.
///
/// - `Previous` reads → slice `t - 1`
/// - `Staged` reads → [`StagedFieldCache`]
/// - Undeclared fields → `None`
pub(crate) struct OverlayReader<'a> {
    routes: &'a IndexMap<FieldId, ReadSource>,
    previous: &'a dyn FieldReader,
    staged: &'a StagedFieldCache,
}

impl<'a> OverlayReader<'a> {
    pub(crate) fn new(
        routes: &'a IndexMap<FieldId, ReadSource>,
        previous: &'a dyn FieldReader,
        staged: &'a StagedFieldCache,
    ) -> Self {
        Self {
            routes,
            previous,
            staged,
        }
    }
}

impl FieldReader for OverlayReader<'_> {
    fn read(&self, field: FieldId) -> Option<&[f64]> {
        match self.routes.get(&field)? {
            ReadSource::Previous => self.previous.read(field),
            ReadSource::Staged { .. } => self.staged.read(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_test_utils::MockFieldReader;

    #[test]
    fn writes_are_limited_to_granted_fields() {
        let mut staged = StagedBuffers::new([FieldId(0), FieldId(1)], 4);
        assert!(staged.write(FieldId(0)).is_none());

        staged.restrict([FieldId(1)].into_iter().collect());
        assert!(staged.write(FieldId(0)).is_none());
        staged.write(FieldId(1)).unwrap()[2] = 5.0;
        assert_eq!(staged.read(FieldId(1)).unwrap(), &[0.0, 0.0, 5.0, 0.0]);

        staged.begin_tick();
        assert!(staged.write(FieldId(1)).is_none());
        assert_eq!(staged.read(FieldId(1)).unwrap(), &[0.0; 4]);
    }

    #[test]
    fn staged_cache_clear_and_reinsert() {
        let mut cache = StagedFieldCache::new();
        cache.insert(FieldId(0), &[1.0, 2.0, 3.0]);
        assert_eq!(cache.read(FieldId(0)), Some([1.0, 2.0, 3.0].as_slice()));
        cache.clear();
        assert!(cache.read(FieldId(0)).is_none());
        cache.insert(FieldId(0), &[4.0]);
        assert_eq!(cache.read(FieldId(0)), Some([4.0].as_slice()));
    }

    #[test]
    fn overlay_routes_previous_and_staged() {
        let mut previous = MockFieldReader::new();
        previous.set_field(FieldId(0), vec![1.0; 4]);
        previous.set_field(FieldId(1), vec![2.0; 4]);

        let mut staged = StagedBuffers::new([FieldId(1)], 4);
        staged.restrict([FieldId(1)].into_iter().collect());
        staged.write(FieldId(1)).unwrap().fill(9.0);

        let mut routes = IndexMap::new();
        routes.insert(FieldId(0), ReadSource::Previous);
        routes.insert(FieldId(1), ReadSource::Staged { writer_index: 0 });
        let mut cache = StagedFieldCache::new();
        cache.refill(&routes, &staged);

        let overlay = OverlayReader::new(&routes, &previous, &cache);
        assert_eq!(overlay.read(FieldId(0)).unwrap()[0], 1.0);
        assert_eq!(overlay.read(FieldId(1)).unwrap()[0], 9.0);
        assert!(overlay.read(FieldId(2)).is_none());
    }
}
