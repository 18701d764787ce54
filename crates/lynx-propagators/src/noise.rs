//! Seeded uniform noise for the initial prey slice.
//!
//! Adds `U(-a, a)` to every cell of a padded slice (ghost ring included)
//! and then clamps every cell to a closed range, `[0, 1]` by default.
//! Uses a ChaCha8 RNG on its own stream so that enabling noise does not
//! perturb the cold-start draw made from the same seed.
//!
//! Constructed via the builder pattern: [`NoiseInjection::builder`].

use lynx_space::PaddedGrid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha stream reserved for noise draws.
pub const NOISE_STREAM: u64 = 1;

/// Additive uniform noise followed by clamping.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseInjection {
    amplitude: f64,
    clamp: (f64, f64),
    seed: u64,
}

/// Builder for [`NoiseInjection`].
pub struct NoiseInjectionBuilder {
    amplitude: f64,
    clamp: (f64, f64),
    seed: u64,
}

impl NoiseInjection {
    /// Create a new builder (amplitude 0.05, clamp `[0, 1]`, seed 0).
    pub fn builder() -> NoiseInjectionBuilder {
        NoiseInjectionBuilder {
            amplitude: 0.05,
            clamp: (0.0, 1.0),
            seed: 0,
        }
    }

    /// Half-width `a` of the noise distribution.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Perturb and clamp every cell of `grid`.
    pub fn apply(&self, grid: &mut PaddedGrid) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(NOISE_STREAM);
        let (lo, hi) = self.clamp;
        for v in grid.as_mut_slice() {
            let u: f64 = rng.random::<f64>() * 2.0 - 1.0;
            *v = (*v + self.amplitude * u).clamp(lo, hi);
        }
    }
}

impl NoiseInjectionBuilder {
    /// Set the noise half-width (default 0.05). Must be finite and >= 0.
    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the clamp range (default `[0, 1]`).
    pub fn clamp(mut self, lo: f64, hi: f64) -> Self {
        self.clamp = (lo, hi);
        self
    }

    /// Set the RNG seed (default 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the operator, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `amplitude` is negative or non-finite, or the clamp
    /// bounds are non-finite or inverted.
    pub fn build(self) -> Result<NoiseInjection, String> {
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(format!(
                "amplitude must be finite and >= 0, got {}",
                self.amplitude
            ));
        }
        let (lo, hi) = self.clamp;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(format!("clamp range [{lo}, {hi}] is invalid"));
        }
        Ok(NoiseInjection {
            amplitude: self.amplitude,
            clamp: self.clamp,
            seed: self.seed,
        })
    }
}
