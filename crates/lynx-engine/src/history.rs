//! Per-tick state slices and the retention policy that bounds them.
//!
//! A [`Slice`] holds one padded grid per state field for a single tick.
//! [`FieldHistory`] keeps slices in ascending tick order and evicts the
//! oldest according to its [`Retention`]. The two most recent slices are
//! always held, since a tick reads `t - 1` while producing `t`.

use std::collections::VecDeque;

use indexmap::IndexMap;
use lynx_core::{FieldId, FieldReader, SnapshotAccess, TickId};
use lynx_space::{GridIndexing, PaddedGrid};

// ── Retention ──────────────────────────────────────────────────────

/// Which slices a [`FieldHistory`] keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retention {
    /// Every slice from the seeded tick onwards.
    Full,
    /// Only the previous and current slice.
    Rolling,
    /// Rolling until the given tick, then every slice from it onwards.
    Since(TickId),
}

impl Retention {
    /// Whether a slice at `tick` outlives the rolling window.
    pub fn keeps(&self, tick: TickId) -> bool {
        match self {
            Self::Full => true,
            Self::Rolling => false,
            Self::Since(start) => tick >= *start,
        }
    }
}

// ── Slice ──────────────────────────────────────────────────────────

/// State of every state field at one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    tick: TickId,
    grids: IndexMap<FieldId, PaddedGrid>,
}

impl Slice {
    /// Assemble a slice from per-field grids.
    pub fn new(tick: TickId, grids: IndexMap<FieldId, PaddedGrid>) -> Self {
        Self { tick, grids }
    }

    /// A zeroed slice for the given fields.
    pub(crate) fn zeros(tick: TickId, grid: GridIndexing, fields: &[FieldId]) -> Self {
        let grids = fields
            .iter()
            .map(|&f| (f, PaddedGrid::zeros(grid)))
            .collect();
        Self { tick, grids }
    }

    /// Tick this slice belongs to.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: TickId) {
        self.tick = tick;
    }

    /// The grid of one field.
    pub fn grid(&self, field: FieldId) -> Option<&PaddedGrid> {
        self.grids.get(&field)
    }

    /// Mutable grid of one field.
    pub fn grid_mut(&mut self, field: FieldId) -> Option<&mut PaddedGrid> {
        self.grids.get_mut(&field)
    }

    /// All `(field, grid)` pairs in field order.
    pub fn grids(&self) -> impl Iterator<Item = (FieldId, &PaddedGrid)> {
        self.grids.iter().map(|(&f, g)| (f, g))
    }

    pub(crate) fn grids_mut(&mut self) -> impl Iterator<Item = &mut PaddedGrid> {
        self.grids.values_mut()
    }

    fn byte_size(&self) -> usize {
        self.grids
            .values()
            .map(|g| g.as_slice().len() * std::mem::size_of::<f64>())
            .sum()
    }
}

impl FieldReader for Slice {
    fn read(&self, field: FieldId) -> Option<&[f64]> {
        self.grids.get(&field).map(PaddedGrid::as_slice)
    }
}

impl SnapshotAccess for Slice {
    fn read_field(&self, field: FieldId) -> Option<&[f64]> {
        self.read(field)
    }

    fn tick_id(&self) -> TickId {
        self.tick
    }
}

// ── FieldHistory ───────────────────────────────────────────────────

/// Ordered store of retained slices.
#[derive(Debug)]
pub struct FieldHistory {
    retention: Retention,
    slices: VecDeque<Slice>,
}

impl FieldHistory {
    /// Start a history from the seeded slice.
    pub fn new(retention: Retention, initial: Slice) -> Self {
        let mut slices = VecDeque::new();
        slices.push_back(initial);
        Self { retention, slices }
    }

    /// The retention policy.
    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Append the next slice and evict what the policy no longer keeps.
    ///
    /// Returns the most recently evicted slice so its buffers can be
    /// reused for the following tick.
    ///
    /// # Panics
    ///
    /// Panics if `slice` does not directly follow the latest tick.
    pub fn push(&mut self, slice: Slice) -> Option<Slice> {
        assert_eq!(
            slice.tick,
            self.latest().tick.next(),
            "slices must be pushed in tick order"
        );
        self.slices.push_back(slice);
        let mut evicted = None;
        while self.slices.len() > 2 {
            match self.slices.front() {
                Some(front) if !self.retention.keeps(front.tick) => {
                    evicted = self.slices.pop_front();
                }
                _ => break,
            }
        }
        evicted
    }

    /// The most recent slice.
    pub fn latest(&self) -> &Slice {
        // Constructed with one slice and never drained below it.
        &self.slices[self.slices.len() - 1]
    }

    /// Mutable access to the most recent slice.
    pub fn latest_mut(&mut self) -> &mut Slice {
        let last = self.slices.len() - 1;
        &mut self.slices[last]
    }

    /// The slice at `tick`, if retained.
    pub fn get(&self, tick: TickId) -> Option<&Slice> {
        let first = self.slices.front()?.tick;
        let offset = tick.0.checked_sub(first.0)?;
        self.slices.get(usize::try_from(offset).ok()?)
    }

    /// Retained slices with `tick >= from`, ascending.
    pub fn since(&self, from: TickId) -> impl Iterator<Item = &Slice> {
        self.slices.iter().filter(move |s| s.tick >= from)
    }

    /// All retained slices, ascending.
    pub fn iter(&self) -> impl Iterator<Item = &Slice> {
        self.slices.iter()
    }

    /// Oldest retained tick.
    pub fn first_tick(&self) -> TickId {
        self.slices[0].tick
    }

    /// Number of retained slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Always `false`: a history holds at least the seeded slice.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Bytes held by retained grids.
    pub fn retained_bytes(&self) -> usize {
        self.slices.iter().map(Slice::byte_size).sum()
    }
}
