//! Padding-aware addressing policy for square periodic lattices.

use crate::error::SpaceError;
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Addressing policy for an `n x n` periodic domain with one ghost ring.
///
/// All boundary and interior arithmetic goes through this type so that
/// no other code carries literal `+1`/`-1` padding offsets. Indices are
/// 0-based over the padded extent `n + 2`:
///
/// - row/col `0` and `n + 1` are padding
/// - row/col `1..=n` are the true domain
///
/// Flat indices are row-major: `row * (n + 2) + col`.
///
/// # Examples
///
/// ```
/// use lynx_space::GridIndexing;
///
/// let ix = GridIndexing::new(4).unwrap();
/// assert_eq!(ix.padded_size(), 6);
/// assert_eq!(ix.cell_count(), 36);
/// assert_eq!(ix.interior_range(), 1..=4);
/// assert!(ix.is_padding(0, 3));
/// assert!(!ix.is_padding(1, 4));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridIndexing {
    domain: u32,
}

impl GridIndexing {
    /// Width of the ghost ring on each side.
    pub const PADDING: usize = 1;

    /// Largest supported domain side length.
    pub const MAX_DOMAIN: u32 = 1 << 15;

    /// Create the policy for an `domain x domain` interior.
    ///
    /// Returns `Err(SpaceError::EmptyDomain)` for a zero domain and
    /// `Err(SpaceError::DimensionTooLarge)` above [`Self::MAX_DOMAIN`].
    pub fn new(domain: u32) -> Result<Self, SpaceError> {
        if domain == 0 {
            return Err(SpaceError::EmptyDomain);
        }
        if domain > Self::MAX_DOMAIN {
            return Err(SpaceError::DimensionTooLarge {
                value: domain,
                max: Self::MAX_DOMAIN,
            });
        }
        Ok(Self { domain })
    }

    /// Side length of the true domain (`n`).
    pub fn domain_size(&self) -> usize {
        self.domain as usize
    }

    /// Side length including the ghost ring (`n + 2`).
    pub fn padded_size(&self) -> usize {
        self.domain as usize + 2 * Self::PADDING
    }

    /// Number of cells in a padded slice.
    pub fn cell_count(&self) -> usize {
        self.padded_size() * self.padded_size()
    }

    /// Number of true-domain cells (`n * n`).
    pub fn interior_count(&self) -> usize {
        self.domain_size() * self.domain_size()
    }

    /// First interior index on either axis.
    pub fn first(&self) -> usize {
        Self::PADDING
    }

    /// Last interior index on either axis.
    pub fn last(&self) -> usize {
        self.domain_size()
    }

    /// Interior indices on either axis (`1..=n`).
    pub fn interior_range(&self) -> RangeInclusive<usize> {
        self.first()..=self.last()
    }

    /// Whether `(row, col)` lies in the ghost ring.
    pub fn is_padding(&self, row: usize, col: usize) -> bool {
        let low = 0;
        let high = self.padded_size() - 1;
        row == low || row == high || col == low || col == high
    }

    /// Flat index of `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate lies outside the padded extent; such
    /// an access is a programming error, not a runtime condition.
    pub fn index(&self, row: usize, col: usize) -> usize {
        let padded = self.padded_size();
        assert!(
            row < padded && col < padded,
            "coordinate ({row}, {col}) outside padded extent {padded}"
        );
        row * padded + col
    }

    /// Checked variant of [`index`](Self::index).
    pub fn try_index(&self, row: usize, col: usize) -> Result<usize, SpaceError> {
        let padded = self.padded_size();
        if row >= padded || col >= padded {
            return Err(SpaceError::CoordOutOfBounds { row, col, padded });
        }
        Ok(row * padded + col)
    }

    /// `(row, col)` of a flat index.
    pub fn coord(&self, index: usize) -> (usize, usize) {
        let padded = self.padded_size();
        (index / padded, index % padded)
    }

    /// The interior cell a padding coordinate mirrors under periodic wrap.
    ///
    /// Interior coordinates map to themselves. Row and column resolve
    /// independently, so a corner mirrors the diagonally opposite
    /// interior corner.
    pub fn wrap_source(&self, row: usize, col: usize) -> (usize, usize) {
        (self.wrap_axis(row), self.wrap_axis(col))
    }

    fn wrap_axis(&self, v: usize) -> usize {
        let n = self.domain_size();
        if v == 0 {
            n
        } else if v == n + 1 {
            1
        } else {
            v
        }
    }

    /// Flat indices of the N/S/W/E neighbours of an interior cell.
    ///
    /// Valid for any interior cell because the ghost ring guarantees
    /// every such neighbour lies within the padded extent.
    pub fn neighbours_flat(&self, index: usize) -> SmallVec<[usize; 4]> {
        let padded = self.padded_size();
        let mut out = SmallVec::new();
        out.push(index - padded);
        out.push(index + padded);
        out.push(index - 1);
        out.push(index + 1);
        out
    }

    /// Iterate over interior `(row, col)` pairs in row-major order.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let range = self.interior_range();
        range
            .clone()
            .flat_map(move |r| range.clone().map(move |c| (r, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_huge_domains() {
        assert_eq!(GridIndexing::new(0), Err(SpaceError::EmptyDomain));
        assert!(matches!(
            GridIndexing::new(GridIndexing::MAX_DOMAIN + 1),
            Err(SpaceError::DimensionTooLarge { .. })
        ));
    }

    #[test]
    fn single_cell_domain() {
        let ix = GridIndexing::new(1).unwrap();
        assert_eq!(ix.padded_size(), 3);
        assert_eq!(ix.interior().collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(ix.wrap_source(0, 0), (1, 1));
        assert_eq!(ix.wrap_source(2, 1), (1, 1));
    }

    #[test]
    fn flat_index_round_trips() {
        let ix = GridIndexing::new(5).unwrap();
        for i in 0..ix.cell_count() {
            let (r, c) = ix.coord(i);
            assert_eq!(ix.index(r, c), i);
        }
    }

    #[test]
    fn try_index_reports_out_of_bounds() {
        let ix = GridIndexing::new(4).unwrap();
        assert_eq!(ix.try_index(5, 5), Ok(35));
        assert_eq!(
            ix.try_index(6, 0),
            Err(SpaceError::CoordOutOfBounds {
                row: 6,
                col: 0,
                padded: 6
            })
        );
    }

    #[test]
    #[should_panic(expected = "outside padded extent")]
    fn index_panics_outside_padding() {
        GridIndexing::new(4).unwrap().index(0, 6);
    }

    #[test]
    fn wrap_source_mirrors_opposite_edge() {
        let ix = GridIndexing::new(4).unwrap();
        assert_eq!(ix.wrap_source(0, 2), (4, 2));
        assert_eq!(ix.wrap_source(5, 2), (1, 2));
        assert_eq!(ix.wrap_source(3, 0), (3, 4));
        assert_eq!(ix.wrap_source(3, 5), (3, 1));
        assert_eq!(ix.wrap_source(0, 5), (4, 1));
        assert_eq!(ix.wrap_source(2, 3), (2, 3));
    }

    #[test]
    fn neighbours_of_interior_corner_touch_padding() {
        let ix = GridIndexing::new(3).unwrap();
        let i = ix.index(1, 1);
        let nbs = ix.neighbours_flat(i);
        assert_eq!(nbs.len(), 4);
        assert!(nbs.contains(&ix.index(0, 1)));
        assert!(nbs.contains(&ix.index(2, 1)));
        assert!(nbs.contains(&ix.index(1, 0)));
        assert!(nbs.contains(&ix.index(1, 2)));
    }

    #[test]
    fn interior_iteration_count() {
        let ix = GridIndexing::new(7).unwrap();
        assert_eq!(ix.interior().count(), ix.interior_count());
        assert!(ix.interior().all(|(r, c)| !ix.is_padding(r, c)));
    }
}
