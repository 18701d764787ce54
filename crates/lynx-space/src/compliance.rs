//! Lattice invariant test helpers.
//!
//! Shared by the unit tests of this crate to check the periodic-wrap
//! contract cell by cell with readable failure messages.

use crate::grid::PaddedGrid;

/// Assert that every padding cell equals its wrap source.
pub fn assert_padding_mirrors_interior(grid: &PaddedGrid) {
    let ix = grid.indexing();
    let padded = ix.padded_size();
    for r in 0..padded {
        for c in 0..padded {
            if !ix.is_padding(r, c) {
                continue;
            }
            let (sr, sc) = ix.wrap_source(r, c);
            let got = grid.get(r, c);
            let want = grid.get(sr, sc);
            assert!(
                got.to_bits() == want.to_bits(),
                "padding ({r}, {c}) = {got}, expected mirror of ({sr}, {sc}) = {want}"
            );
        }
    }
}

/// Assert that every interior stencil neighbour is inside the padded buffer
/// and that padding neighbours resolve to the wrapped interior cell.
pub fn assert_neighbours_wrap(grid: &PaddedGrid) {
    let ix = grid.indexing();
    let n = ix.domain_size();
    for (r, c) in ix.interior() {
        let idx = ix.index(r, c);
        for nb in ix.neighbours_flat(idx) {
            assert!(nb < ix.cell_count(), "neighbour {nb} of ({r}, {c}) outside buffer");
            let (nr, nc) = ix.coord(nb);
            let (sr, sc) = ix.wrap_source(nr, nc);
            assert!(
                (1..=n).contains(&sr) && (1..=n).contains(&sc),
                "neighbour ({nr}, {nc}) of ({r}, {c}) wraps outside the domain"
            );
            assert_eq!(
                grid.get(nr, nc).to_bits(),
                grid.get(sr, sc).to_bits(),
                "neighbour ({nr}, {nc}) of ({r}, {c}) not synchronized"
            );
        }
    }
}
