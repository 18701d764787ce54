use lynx_space::{is_synchronized, synchronize, GridIndexing, PaddedGrid, SpaceError};

fn grid_from_fn(n: u32, f: impl Fn(usize, usize) -> f64) -> PaddedGrid {
    let ix = GridIndexing::new(n).unwrap();
    let mut g = PaddedGrid::zeros(ix);
    for (r, c) in ix.interior() {
        g.set(r, c, f(r, c));
    }
    g
}

#[test]
fn stencil_at_corner_sees_wrapped_neighbours() {
    let mut g = grid_from_fn(5, |r, c| (r * 10 + c) as f64);
    synchronize(&mut g);
    let ix = g.indexing();
    let i = ix.index(1, 1);
    let values: Vec<f64> = ix
        .neighbours_flat(i)
        .iter()
        .map(|&j| g.as_slice()[j])
        .collect();
    // N wraps to row 5, S is row 2, W wraps to column 5, E is column 2.
    assert_eq!(values, vec![51.0, 21.0, 15.0, 12.0]);
}

#[test]
fn rows_round_trip_through_table_form() {
    let mut g = grid_from_fn(3, |r, c| r as f64 - c as f64 * 0.5);
    synchronize(&mut g);
    let rows: Vec<Vec<f64>> = g.rows().map(<[f64]>::to_vec).collect();
    let back = PaddedGrid::from_rows(g.indexing(), rows).unwrap();
    assert_eq!(back, g);
    assert!(is_synchronized(&back));
}

#[test]
fn table_from_other_domain_is_rejected() {
    let small = grid_from_fn(2, |_, _| 1.0);
    let rows: Vec<Vec<f64>> = small.rows().map(<[f64]>::to_vec).collect();
    let err = PaddedGrid::from_rows(GridIndexing::new(3).unwrap(), rows).unwrap_err();
    assert!(matches!(err, SpaceError::ShapeMismatch { .. }));
}
