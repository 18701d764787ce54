//! Reaction update propagators for prey and predator.
//!
//! Each tick advances the interior of one state field from slice `t - 1`
//! to slice `t`:
//!
//! ```text
//! X[t] = max0( μ · X · (1 − X) · exp(−β · Y) + D1 · ∇X )
//! Y[t] = max0( X · (1 − exp(−β · Y)) + D2 · ∇Y )
//! ```
//!
//! `X` and `Y` come from the previous slice, `∇X` and `∇Y` from the
//! coupling buffers staged earlier in the same tick. `max0` floors
//! negative values at zero and passes NaN through unchanged.

use crate::fields::{PREDATOR, PREDATOR_COUPLING, PREY, PREY_COUPLING};
use lynx_core::{FieldId, FieldSet, PropagatorError};
use lynx_propagator::{FullWriteGuard, Propagator, StepContext};

/// Floor at zero without masking NaN.
///
/// `f64::max(v, 0.0)` returns `0.0` for NaN input, which would hide a
/// diverged cell from the divergence check.
#[inline]
pub fn floor_at_zero(v: f64) -> f64 {
    if v < 0.0 {
        0.0
    } else {
        v
    }
}

/// New prey density from prey `x`, predator `y` and prey coupling `lap`.
#[inline]
pub fn prey_update(x: f64, y: f64, lap: f64, growth: f64, predation: f64, diffusion: f64) -> f64 {
    floor_at_zero(growth * x * (1.0 - x) * (-predation * y).exp() + diffusion * lap)
}

/// New predator density from prey `x`, predator `y` and predator coupling `lap`.
#[inline]
pub fn predator_update(x: f64, y: f64, lap: f64, predation: f64, diffusion: f64) -> f64 {
    floor_at_zero(x * (1.0 - (-predation * y).exp()) + diffusion * lap)
}

fn check_rate(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be finite and >= 0, got {value}"));
    }
    Ok(())
}

/// Field wiring shared by both reaction propagators.
#[derive(Clone, Copy, Debug)]
struct Wiring {
    prey: FieldId,
    predator: FieldId,
    coupling: FieldId,
}

impl Wiring {
    fn reads_previous(&self) -> FieldSet {
        [self.prey, self.predator].into_iter().collect()
    }

    fn validate(&self) -> Result<(), String> {
        if self.prey == self.predator {
            return Err("prey and predator must be distinct fields".to_string());
        }
        if self.coupling == self.prey || self.coupling == self.predator {
            return Err("coupling field must differ from the state fields".to_string());
        }
        Ok(())
    }
}

/// Apply `update(x, y, lap)` to every interior cell of `output`.
fn react(
    ctx: &mut StepContext<'_>,
    name: &str,
    wiring: Wiring,
    output: FieldId,
    update: impl Fn(f64, f64, f64) -> f64,
) -> Result<(), PropagatorError> {
    let grid = ctx.grid();
    let x = ctx.read_previous_checked(wiring.prey)?;
    let y = ctx.read_previous_checked(wiring.predator)?;
    let lap = ctx.read_checked(wiring.coupling)?;
    let out = ctx
        .writes()
        .write(output)
        .ok_or(PropagatorError::FieldNotWritable { field_id: output })?;
    if out.len() != grid.cell_count() {
        return Err(PropagatorError::LengthMismatch {
            field_id: output,
            expected: grid.cell_count(),
            actual: out.len(),
        });
    }

    let mut guard = FullWriteGuard::new(out, grid, name, output);
    for (r, c) in grid.interior() {
        let i = grid.index(r, c);
        guard.write_at(i, update(x[i], y[i], lap[i]));
    }
    Ok(())
}

// ── Prey ───────────────────────────────────────────────────────────

/// Logistic growth of prey damped by predation, plus diffusion.
///
/// ```
/// use lynx_propagators::PreyReaction;
///
/// let prop = PreyReaction::builder()
///     .growth(4.0)
///     .predation(5.0)
///     .diffusion(0.001)
///     .build()
///     .unwrap();
/// assert_eq!(prop.growth(), 4.0);
/// ```
#[derive(Debug)]
pub struct PreyReaction {
    wiring: Wiring,
    growth: f64,
    predation: f64,
    diffusion: f64,
}

/// Builder for [`PreyReaction`].
///
/// Fields default to the standard [`PREY`], [`PREDATOR`] and
/// [`PREY_COUPLING`] ids; rates default to zero.
pub struct PreyReactionBuilder {
    wiring: Wiring,
    growth: f64,
    predation: f64,
    diffusion: f64,
}

impl PreyReaction {
    /// Create a new builder.
    pub fn builder() -> PreyReactionBuilder {
        PreyReactionBuilder {
            wiring: Wiring {
                prey: PREY,
                predator: PREDATOR,
                coupling: PREY_COUPLING,
            },
            growth: 0.0,
            predation: 0.0,
            diffusion: 0.0,
        }
    }

    /// Growth rate `μ`.
    pub fn growth(&self) -> f64 {
        self.growth
    }

    /// Predation rate `β`.
    pub fn predation(&self) -> f64 {
        self.predation
    }

    /// Prey diffusion `D1`.
    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }
}

impl PreyReactionBuilder {
    /// Override the prey, predator and prey-coupling field ids.
    pub fn fields(mut self, prey: FieldId, predator: FieldId, coupling: FieldId) -> Self {
        self.wiring = Wiring {
            prey,
            predator,
            coupling,
        };
        self
    }

    /// Set the growth rate `μ`. Must be finite and >= 0.
    pub fn growth(mut self, growth: f64) -> Self {
        self.growth = growth;
        self
    }

    /// Set the predation rate `β`. Must be finite and >= 0.
    pub fn predation(mut self, predation: f64) -> Self {
        self.predation = predation;
        self
    }

    /// Set the diffusion coefficient `D1`. Must be finite and >= 0.
    pub fn diffusion(mut self, diffusion: f64) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Build the propagator, validating all configuration.
    pub fn build(self) -> Result<PreyReaction, String> {
        self.wiring.validate()?;
        check_rate("growth", self.growth)?;
        check_rate("predation", self.predation)?;
        check_rate("diffusion", self.diffusion)?;
        Ok(PreyReaction {
            wiring: self.wiring,
            growth: self.growth,
            predation: self.predation,
            diffusion: self.diffusion,
        })
    }
}

impl Propagator for PreyReaction {
    fn name(&self) -> &str {
        "PreyReaction"
    }

    fn reads(&self) -> FieldSet {
        [self.wiring.coupling].into_iter().collect()
    }

    fn reads_previous(&self) -> FieldSet {
        self.wiring.reads_previous()
    }

    fn writes(&self) -> FieldSet {
        [self.wiring.prey].into_iter().collect()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        let (mu, beta, d1) = (self.growth, self.predation, self.diffusion);
        react(ctx, self.name(), self.wiring, self.wiring.prey, |x, y, lap| {
            prey_update(x, y, lap, mu, beta, d1)
        })
    }
}

// ── Predator ───────────────────────────────────────────────────────

/// Predator recruitment from captured prey, plus diffusion.
#[derive(Debug)]
pub struct PredatorReaction {
    wiring: Wiring,
    predation: f64,
    diffusion: f64,
}

/// Builder for [`PredatorReaction`].
///
/// Fields default to the standard [`PREY`], [`PREDATOR`] and
/// [`PREDATOR_COUPLING`] ids; rates default to zero.
pub struct PredatorReactionBuilder {
    wiring: Wiring,
    predation: f64,
    diffusion: f64,
}

impl PredatorReaction {
    /// Create a new builder.
    pub fn builder() -> PredatorReactionBuilder {
        PredatorReactionBuilder {
            wiring: Wiring {
                prey: PREY,
                predator: PREDATOR,
                coupling: PREDATOR_COUPLING,
            },
            predation: 0.0,
            diffusion: 0.0,
        }
    }

    /// Predation rate `β`.
    pub fn predation(&self) -> f64 {
        self.predation
    }

    /// Predator diffusion `D2`.
    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }
}

impl PredatorReactionBuilder {
    /// Override the prey, predator and predator-coupling field ids.
    pub fn fields(mut self, prey: FieldId, predator: FieldId, coupling: FieldId) -> Self {
        self.wiring = Wiring {
            prey,
            predator,
            coupling,
        };
        self
    }

    /// Set the predation rate `β`. Must be finite and >= 0.
    pub fn predation(mut self, predation: f64) -> Self {
        self.predation = predation;
        self
    }

    /// Set the diffusion coefficient `D2`. Must be finite and >= 0.
    pub fn diffusion(mut self, diffusion: f64) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Build the propagator, validating all configuration.
    pub fn build(self) -> Result<PredatorReaction, String> {
        self.wiring.validate()?;
        check_rate("predation", self.predation)?;
        check_rate("diffusion", self.diffusion)?;
        Ok(PredatorReaction {
            wiring: self.wiring,
            predation: self.predation,
            diffusion: self.diffusion,
        })
    }
}

impl Propagator for PredatorReaction {
    fn name(&self) -> &str {
        "PredatorReaction"
    }

    fn reads(&self) -> FieldSet {
        [self.wiring.coupling].into_iter().collect()
    }

    fn reads_previous(&self) -> FieldSet {
        self.wiring.reads_previous()
    }

    fn writes(&self) -> FieldSet {
        [self.wiring.predator].into_iter().collect()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        let (beta, d2) = (self.predation, self.diffusion);
        react(ctx, self.name(), self.wiring, self.wiring.predator, |x, y, lap| {
            predator_update(x, y, lap, beta, d2)
        })
    }
}
