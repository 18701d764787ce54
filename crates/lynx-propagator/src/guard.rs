//! Debug-mode interior write coverage tracking.
//!
//! [`FullWriteGuard`] wraps a mutable padded buffer and, in debug builds,
//! tracks which interior cells have been written. On drop it emits a
//! `tracing` warning if coverage is incomplete. Release builds pay zero
//! overhead.

use lynx_core::FieldId;
use lynx_space::GridIndexing;

/// Guard that tracks interior write coverage of one output buffer.
///
/// Ghost cells are excluded from coverage: they are filled by the
/// boundary synchronizer, never by propagators.
pub struct FullWriteGuard<'a> {
    data: &'a mut [f64],
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    grid: GridIndexing,
    #[cfg(debug_assertions)]
    written: Vec<bool>,
    #[cfg(debug_assertions)]
    propagator_name: String,
    #[cfg(debug_assertions)]
    field_id: FieldId,
}

impl<'a> FullWriteGuard<'a> {
    /// Create a new guard wrapping a padded buffer.
    ///
    /// `propagator_name` and `field_id` are used for diagnostics in debug
    /// builds.
    pub fn new(
        data: &'a mut [f64],
        grid: GridIndexing,
        #[cfg_attr(not(debug_assertions), allow(unused_variables))] propagator_name: &str,
        #[cfg_attr(not(debug_assertions), allow(unused_variables))] field_id: FieldId,
    ) -> Self {
        Self {
            #[cfg(debug_assertions)]
            written: vec![false; data.len()],
            #[cfg(debug_assertions)]
            propagator_name: propagator_name.to_string(),
            #[cfg(debug_assertions)]
            field_id,
            data,
            grid,
        }
    }

    /// Write a single value at a flat padded index.
    pub fn write_at(&mut self, index: usize, value: f64) {
        self.data[index] = value;
        #[cfg(debug_assertions)]
        {
            self.written[index] = true;
        }
    }

    /// Number of cells in the padded buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fraction of interior cells written (always 1.0 in release builds).
    pub fn coverage(&self) -> f64 {
        #[cfg(debug_assertions)]
        {
            let (count, total) = self.interior_counts();
            if total == 0 {
                return 1.0;
            }
            count as f64 / total as f64
        }
        #[cfg(not(debug_assertions))]
        {
            1.0
        }
    }

    /// Explicitly mark the guard as complete, suppressing the drop diagnostic.
    pub fn mark_complete(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.written.fill(true);
        }
    }

    #[cfg(debug_assertions)]
    fn interior_counts(&self) -> (usize, usize) {
        if self.data.len() != self.grid.cell_count() {
            let count = self.written.iter().filter(|&&b| b).count();
            return (count, self.written.len());
        }
        let count = self
            .grid
            .interior()
            .filter(|&(r, c)| self.written[self.grid.index(r, c)])
            .count();
        (count, self.grid.interior_count())
    }
}

#[cfg(debug_assertions)]
impl Drop for FullWriteGuard<'_> {
    fn drop(&mut self) {
        let (count, total) = self.interior_counts();
        if count < total {
            tracing::warn!(
                propagator = %self.propagator_name,
                field = %self.field_id,
                written = count,
                total,
                "incomplete interior write: {:.1}% covered",
                (count as f64 / total as f64) * 100.0,
            );
        }
    }
}
