//! Periodic boundary synchronization.
//!
//! Copies each interior edge into the ghost ring on the opposite side so
//! that a stencil reading a padding cell sees the wrapped interior value.
//! Ghost columns are filled for each interior row first, then whole rows
//! are copied over the padded width, so the four corners receive the
//! diagonally opposite interior corner.
//! Interior cells are never touched and the operation is idempotent.

use crate::grid::PaddedGrid;
use crate::indexing::GridIndexing;

/// Synchronize the ghost ring of an owned slice.
pub fn synchronize(grid: &mut PaddedGrid) {
    let indexing = grid.indexing();
    synchronize_slice(indexing, grid.as_mut_slice());
}

/// Synchronize the ghost ring of a raw padded buffer.
///
/// # Panics
///
/// Panics if `cells.len()` differs from [`GridIndexing::cell_count`].
pub fn synchronize_slice(indexing: GridIndexing, cells: &mut [f64]) {
    assert_eq!(
        cells.len(),
        indexing.cell_count(),
        "buffer length does not match padded grid"
    );
    let padded = indexing.padded_size();
    let n = indexing.domain_size();
    let (first, last) = (indexing.first(), indexing.last());

    // West and east ghost columns of each interior row.
    for r in indexing.interior_range() {
        let base = r * padded;
        cells[base] = cells[base + last];
        cells[base + n + 1] = cells[base + first];
    }

    // North and south ghost rows, corners included.
    cells.copy_within(last * padded..(last + 1) * padded, 0);
    cells.copy_within(first * padded..(first + 1) * padded, (n + 1) * padded);
}

/// Whether every padding cell equals the interior cell it mirrors.
///
/// Comparison is bitwise so NaN padding matches NaN interior.
pub fn is_synchronized(grid: &PaddedGrid) -> bool {
    first_unsynchronized(grid).is_none()
}

/// The first padding `(row, col)` that disagrees with its wrap source.
pub fn first_unsynchronized(grid: &PaddedGrid) -> Option<(usize, usize)> {
    let indexing = grid.indexing();
    let padded = indexing.padded_size();
    (0..padded)
        .flat_map(|r| (0..padded).map(move |c| (r, c)))
        .filter(|&(r, c)| indexing.is_padding(r, c))
        .find(|&(r, c)| {
            let (sr, sc) = indexing.wrap_source(r, c);
            grid.get(r, c).to_bits() != grid.get(sr, sc).to_bits()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn numbered(n: u32) -> PaddedGrid {
        let ix = GridIndexing::new(n).unwrap();
        let mut g = PaddedGrid::filled(ix, -1.0);
        for (r, c) in ix.interior() {
            g.set(r, c, (r * 100 + c) as f64);
        }
        g
    }

    #[test]
    fn four_by_four_edges_and_corners() {
        let mut g = numbered(4);
        synchronize(&mut g);
        // North ghost row mirrors row 4, south mirrors row 1.
        assert_eq!(g.get(0, 2), 402.0);
        assert_eq!(g.get(5, 2), 102.0);
        // West ghost column mirrors column 4, east mirrors column 1.
        assert_eq!(g.get(3, 0), 304.0);
        assert_eq!(g.get(3, 5), 301.0);
        // Corners.
        assert_eq!(g.get(0, 0), 404.0);
        assert_eq!(g.get(0, 5), 401.0);
        assert_eq!(g.get(5, 0), 104.0);
        assert_eq!(g.get(5, 5), 101.0);
        assert!(is_synchronized(&g));
    }

    #[test]
    fn single_cell_fills_ring_with_itself() {
        let mut g = numbered(1);
        synchronize(&mut g);
        assert!(g.as_slice().iter().all(|&v| v == 101.0));
    }

    #[test]
    fn detects_stale_padding() {
        let mut g = numbered(3);
        synchronize(&mut g);
        g.set(4, 2, 0.5);
        assert_eq!(first_unsynchronized(&g), Some((4, 2)));
        assert!(!is_synchronized(&g));
    }

    #[test]
    fn nan_propagates_into_padding() {
        let mut g = numbered(3);
        g.set(1, 1, f64::NAN);
        synchronize(&mut g);
        assert!(g.get(4, 1).is_nan());
        assert!(g.get(1, 4).is_nan());
        assert!(g.get(4, 4).is_nan());
        assert!(is_synchronized(&g));
    }

    #[test]
    #[should_panic(expected = "buffer length")]
    fn slice_length_checked() {
        let ix = GridIndexing::new(3).unwrap();
        let mut cells = vec![0.0; 24];
        synchronize_slice(ix, &mut cells);
    }

    proptest! {
        #[test]
        fn sync_preserves_interior_and_is_idempotent(
            n in 1u32..12,
            seed in prop::collection::vec(-1.0e3f64..1.0e3, 196),
        ) {
            let ix = GridIndexing::new(n).unwrap();
            let cells: Vec<f64> = seed.iter().copied().cycle().take(ix.cell_count()).collect();
            let mut g = PaddedGrid::from_vec(ix, cells).unwrap();
            let before: Vec<f64> = g.interior_values().collect();

            synchronize(&mut g);
            let once = g.clone();
            synchronize(&mut g);

            prop_assert_eq!(g.interior_values().collect::<Vec<_>>(), before);
            prop_assert_eq!(&g, &once);
            compliance::assert_padding_mirrors_interior(&g);
            compliance::assert_neighbours_wrap(&g);
        }
    }
}
