//! Summary statistics over the interior of a slice.

use lynx_space::PaddedGrid;

/// Minimum, maximum and mean of the finite interior values of a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    /// Smallest finite interior value.
    pub min: f64,
    /// Largest finite interior value.
    pub max: f64,
    /// Mean of finite interior values.
    pub mean: f64,
    /// Interior cells holding NaN or ±inf, excluded from the above.
    pub non_finite: usize,
}

impl FieldStats {
    /// Compute statistics over the interior of `grid`.
    ///
    /// With no finite cells, `min`, `max` and `mean` are NaN.
    pub fn of(grid: &PaddedGrid) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        let mut non_finite = 0usize;
        for v in grid.interior_values() {
            if !v.is_finite() {
                non_finite += 1;
                continue;
            }
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }
        if count == 0 {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                non_finite,
            };
        }
        Self {
            min,
            max,
            mean: sum / count as f64,
            non_finite,
        }
    }
}
