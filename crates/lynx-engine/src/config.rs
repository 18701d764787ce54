//! World and simulation configuration, validation, and error types.
//!
//! [`WorldConfig`] is the engine-level input: a lattice, field list and
//! propagator pipeline. [`SimulationConfig`] is the predator–prey
//! parameter set; [`SimulationConfig::world_config`] turns it into the
//! standard coupling and reaction pipeline.

use std::error::Error;
use std::fmt;

use lynx_core::{FieldDef, FieldId, TickId};
use lynx_propagator::{validate_pipeline, PipelineError, Propagator, ReadResolutionPlan};
use lynx_propagators::{lotka_fields, Coupling, PredatorReaction, PreyReaction};
use lynx_space::{GridIndexing, SpaceError};

use crate::history::Retention;

// ── ColdStartRange ─────────────────────────────────────────────────

/// Half-open range `[min, max)` for cold-start draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColdStartRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound (returned only when `min == max`).
    pub max: f64,
}

impl ColdStartRange {
    /// Construct a range without validation.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a unit draw `u` in `[0, 1)` into the range.
    pub fn scale(&self, u: f64) -> f64 {
        self.min + (self.max - self.min) * u
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

// ── DivergencePolicy ───────────────────────────────────────────────

/// What the tick engine does when a state field turns non-finite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DivergencePolicy {
    /// Fail the tick with `StepError::NumericDivergence`; nothing is committed.
    #[default]
    Abort,
    /// Commit the values unchanged and warn once per field.
    Propagate,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a configuration or building a world.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Propagator pipeline validation failed.
    Pipeline(PipelineError),
    /// The lattice could not be constructed.
    Space(SpaceError),
    /// A propagator builder rejected its parameters.
    Propagator {
        /// Which propagator.
        name: &'static str,
        /// Builder message.
        reason: String,
    },
    /// No fields registered.
    NoFields,
    /// A field definition failed validation.
    InvalidField {
        /// Description of the validation failure.
        reason: String,
    },
    /// Horizon is below the seeded tick.
    HorizonTooSmall {
        /// The configured horizon.
        horizon: u64,
    },
    /// Animation start lies outside `[1, horizon]`.
    AnimationStartOutOfRange {
        /// The configured start.
        start: u64,
        /// The configured horizon.
        horizon: u64,
    },
    /// A rate parameter is negative or non-finite.
    InvalidRate {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A cold-start range is inverted or non-finite.
    InvalidRange {
        /// Field the range belongs to.
        field: &'static str,
        /// The rejected range.
        range: ColdStartRange,
    },
    /// Progress checkpoint count is zero.
    NoCheckpoints,
    /// Frame rate is zero.
    ZeroFrameRate,
    /// The table delimiter can appear inside a formatted number.
    InvalidDelimiter {
        /// The rejected delimiter.
        delimiter: char,
    },
    /// A state field has no initial slice.
    MissingInitialSlice {
        /// Name of the field.
        field: String,
    },
    /// An initial slice was built for a different lattice.
    InitialShapeMismatch {
        /// Name of the field.
        field: String,
        /// Expected padded extent.
        expected: usize,
        /// Padded extent of the supplied slice.
        found: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline(e) => write!(f, "pipeline: {e}"),
            Self::Space(e) => write!(f, "lattice: {e}"),
            Self::Propagator { name, reason } => write!(f, "{name}: {reason}"),
            Self::NoFields => write!(f, "no fields registered"),
            Self::InvalidField { reason } => write!(f, "invalid field: {reason}"),
            Self::HorizonTooSmall { horizon } => {
                write!(f, "horizon must be at least 1, got {horizon}")
            }
            Self::AnimationStartOutOfRange { start, horizon } => {
                write!(f, "animation start {start} is outside [1, {horizon}]")
            }
            Self::InvalidRate { name, value } => {
                write!(f, "{name} must be finite and >= 0, got {value}")
            }
            Self::InvalidRange { field, range } => write!(
                f,
                "{field} cold-start range [{}, {}) is invalid",
                range.min, range.max
            ),
            Self::NoCheckpoints => write!(f, "progress checkpoint count must be at least 1"),
            Self::ZeroFrameRate => write!(f, "frame rate must be at least 1"),
            Self::InvalidDelimiter { delimiter } => {
                write!(f, "delimiter {delimiter:?} collides with numeric content")
            }
            Self::MissingInitialSlice { field } => {
                write!(f, "state field '{field}' has no initial slice")
            }
            Self::InitialShapeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "initial slice of '{field}' is {found}x{found}, expected {expected}x{expected}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pipeline(e) => Some(e),
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PipelineError> for ConfigError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

/// Whether `c` can occur in a decimal written or accepted by the table codec.
pub fn delimiter_collides(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '.' | '-' | '+')
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a tick engine.
pub struct WorldConfig {
    /// Lattice addressing shared by every slice.
    pub grid: GridIndexing,
    /// Field definitions. `FieldId(n)` corresponds to `fields[n]`.
    pub fields: Vec<FieldDef>,
    /// Propagators executed in pipeline order each tick.
    pub propagators: Vec<Box<dyn Propagator>>,
    /// Last tick of the run.
    pub horizon: TickId,
    /// Which slices the history keeps.
    pub retention: Retention,
    /// Response to non-finite state values.
    pub divergence: DivergencePolicy,
}

impl WorldConfig {
    /// Validate structural invariants and build the read resolution plan.
    pub fn validate(&self) -> Result<ReadResolutionPlan, ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        for field in &self.fields {
            field
                .validate()
                .map_err(|reason| ConfigError::InvalidField { reason })?;
        }
        if self.horizon < TickId::INITIAL {
            return Err(ConfigError::HorizonTooSmall {
                horizon: self.horizon.0,
            });
        }
        Ok(validate_pipeline(&self.propagators, &self.fields)?)
    }

    /// IDs of all fields, in definition order.
    pub(crate) fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        (0u32..).zip(&self.fields).map(|(i, _)| FieldId(i))
    }
}

impl fmt::Debug for WorldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldConfig")
            .field("domain_size", &self.grid.domain_size())
            .field("fields", &self.fields.len())
            .field("propagators", &self.propagators.len())
            .field("horizon", &self.horizon)
            .field("retention", &self.retention)
            .field("divergence", &self.divergence)
            .finish()
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Parameters of one predator–prey run, fixed before the first tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Interior side length `n`.
    pub domain_size: u32,
    /// Last tick `T`; tick 1 is the seeded slice.
    pub horizon: u64,
    /// Prey growth rate μ.
    pub growth: f64,
    /// Predation strength β.
    pub predation: f64,
    /// Prey coupling coefficient D1.
    pub prey_diffusion: f64,
    /// Predator coupling coefficient D2.
    pub predator_diffusion: f64,
    /// Cold-start range of prey.
    pub prey_range: ColdStartRange,
    /// Cold-start range of predator.
    pub predator_range: ColdStartRange,
    /// Load tick 1 from the warm-start store instead of drawing it.
    pub warm_start: bool,
    /// Perturb the initial prey slice.
    pub noise: bool,
    /// Noise half-width `a`.
    pub noise_amplitude: f64,
    /// Number of evenly spaced progress reports per phase.
    pub progress_checkpoints: u32,
    /// First tick rendered.
    pub animation_start: u64,
    /// Animation frames per second.
    pub frame_rate: u32,
    /// RNG seed for cold starts and noise.
    pub seed: u64,
    /// Column separator of warm-start tables.
    pub delimiter: char,
    /// Response to non-finite state values.
    pub divergence: DivergencePolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            domain_size: 100,
            horizon: 500,
            growth: 4.0,
            predation: 5.0,
            prey_diffusion: 0.001,
            predator_diffusion: 0.2,
            prey_range: ColdStartRange::new(0.0, 1.0),
            predator_range: ColdStartRange::new(0.3, 0.4),
            warm_start: false,
            noise: false,
            noise_amplitude: 0.05,
            progress_checkpoints: 10,
            animation_start: 1,
            frame_rate: 20,
            seed: 42,
            delimiter: '|',
            divergence: DivergencePolicy::Abort,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GridIndexing::new(self.domain_size)?;
        if self.horizon < 1 {
            return Err(ConfigError::HorizonTooSmall {
                horizon: self.horizon,
            });
        }
        if self.animation_start < 1 || self.animation_start > self.horizon {
            return Err(ConfigError::AnimationStartOutOfRange {
                start: self.animation_start,
                horizon: self.horizon,
            });
        }
        for (name, value) in [
            ("growth", self.growth),
            ("predation", self.predation),
            ("prey_diffusion", self.prey_diffusion),
            ("predator_diffusion", self.predator_diffusion),
            ("noise_amplitude", self.noise_amplitude),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        for (field, range) in [("prey", self.prey_range), ("predator", self.predator_range)] {
            if !range.is_valid() {
                return Err(ConfigError::InvalidRange { field, range });
            }
        }
        if self.progress_checkpoints == 0 {
            return Err(ConfigError::NoCheckpoints);
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if delimiter_collides(self.delimiter) {
            return Err(ConfigError::InvalidDelimiter {
                delimiter: self.delimiter,
            });
        }
        Ok(())
    }

    /// Lattice addressing for this run.
    pub fn indexing(&self) -> Result<GridIndexing, ConfigError> {
        Ok(GridIndexing::new(self.domain_size)?)
    }

    /// Coupling followed by the prey and predator reactions.
    pub fn pipeline(&self) -> Result<Vec<Box<dyn Propagator>>, ConfigError> {
        let prey = PreyReaction::builder()
            .growth(self.growth)
            .predation(self.predation)
            .diffusion(self.prey_diffusion)
            .build()
            .map_err(|reason| ConfigError::Propagator {
                name: "PreyReaction",
                reason,
            })?;
        let predator = PredatorReaction::builder()
            .predation(self.predation)
            .diffusion(self.predator_diffusion)
            .build()
            .map_err(|reason| ConfigError::Propagator {
                name: "PredatorReaction",
                reason,
            })?;
        Ok(vec![
            Box::new(Coupling::lotka()),
            Box::new(prey),
            Box::new(predator),
        ])
    }

    /// Retention that keeps exactly the rendered window.
    pub fn render_retention(&self) -> Retention {
        if self.animation_start <= 1 {
            Retention::Full
        } else {
            Retention::Since(TickId(self.animation_start))
        }
    }

    /// Validate and assemble the engine configuration.
    pub fn world_config(&self, retention: Retention) -> Result<WorldConfig, ConfigError> {
        self.validate()?;
        Ok(WorldConfig {
            grid: self.indexing()?,
            fields: lotka_fields(),
            propagators: self.pipeline()?,
            horizon: TickId(self.horizon),
            retention,
            divergence: self.divergence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_test_utils::fixtures::{ConstPropagator, HoldPropagator};

    fn hold_world() -> WorldConfig {
        WorldConfig {
            grid: GridIndexing::new(4).unwrap(),
            fields: vec![FieldDef::state("energy")],
            propagators: vec![Box::new(HoldPropagator::new("hold", &[FieldId(0)]))],
            horizon: TickId(5),
            retention: Retention::Full,
            divergence: DivergencePolicy::Abort,
        }
    }

    #[test]
    fn defaults_validate() {
        let cfg = SimulationConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.domain_size, 100);
        assert_eq!(cfg.horizon, 500);
        assert_eq!(cfg.delimiter, '|');
        assert_eq!(cfg.divergence, DivergencePolicy::Abort);
    }

    #[test]
    fn world_validate_succeeds() {
        let plan = hold_world().validate().unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn world_validate_empty_pipeline_fails() {
        let mut cfg = hold_world();
        cfg.propagators.clear();
        match cfg.validate() {
            Err(ConfigError::Pipeline(PipelineError::EmptyPipeline)) => {}
            other => panic!("expected Pipeline(EmptyPipeline), got {other:?}"),
        }
    }

    #[test]
    fn world_validate_write_conflict_fails() {
        let mut cfg = hold_world();
        cfg.propagators
            .push(Box::new(ConstPropagator::new("conflict", &[FieldId(0)], 2.0)));
        match cfg.validate() {
            Err(ConfigError::Pipeline(PipelineError::WriteConflict(_))) => {}
            other => panic!("expected Pipeline(WriteConflict), got {other:?}"),
        }
    }

    #[test]
    fn world_validate_rejects_bad_field_name_and_horizon() {
        let mut cfg = hold_world();
        cfg.fields[0].name = "bad name".into();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidField { .. })
        ));

        let mut cfg = hold_world();
        cfg.horizon = TickId(0);
        assert_eq!(
            cfg.validate().unwrap_err(),
            ConfigError::HorizonTooSmall { horizon: 0 }
        );
    }

    #[test]
    fn zero_domain_is_a_space_error() {
        let cfg = SimulationConfig {
            domain_size: 0,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate().unwrap_err(),
            ConfigError::Space(SpaceError::EmptyDomain)
        );
    }

    #[test]
    fn animation_start_must_lie_in_run() {
        for start in [0, 501] {
            let cfg = SimulationConfig {
                animation_start: start,
                ..Default::default()
            };
            assert_eq!(
                cfg.validate().unwrap_err(),
                ConfigError::AnimationStartOutOfRange {
                    start,
                    horizon: 500
                }
            );
        }
        let cfg = SimulationConfig {
            animation_start: 500,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_negative_and_nan_rates() {
        let cfg = SimulationConfig {
            prey_diffusion: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRate {
                name: "prey_diffusion",
                ..
            })
        ));
        let cfg = SimulationConfig {
            growth: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRate { name: "growth", .. })
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        let cfg = SimulationConfig {
            predator_range: ColdStartRange::new(0.5, 0.1),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRange {
                field: "predator",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_counts() {
        let cfg = SimulationConfig {
            progress_checkpoints: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::NoCheckpoints);
        let cfg = SimulationConfig {
            frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::ZeroFrameRate);
    }

    #[test]
    fn delimiter_must_not_look_numeric() {
        for delimiter in ['1', '.', '-', '+', 'e', 'N', ' ', '\t'] {
            let cfg = SimulationConfig {
                delimiter,
                ..Default::default()
            };
            assert_eq!(
                cfg.validate().unwrap_err(),
                ConfigError::InvalidDelimiter { delimiter },
                "{delimiter:?}"
            );
        }
        for delimiter in ['|', ',', ';'] {
            assert!(!delimiter_collides(delimiter));
        }
    }

    #[test]
    fn world_config_builds_lotka_pipeline() {
        let cfg = SimulationConfig {
            domain_size: 8,
            horizon: 10,
            ..Default::default()
        };
        let world = cfg.world_config(Retention::Rolling).unwrap();
        assert_eq!(world.fields.len(), 4);
        let names: Vec<&str> = world.propagators.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["Coupling", "PreyReaction", "PredatorReaction"]);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn render_retention_follows_animation_start() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.render_retention(), Retention::Full);
        let cfg = SimulationConfig {
            animation_start: 40,
            ..Default::default()
        };
        assert_eq!(cfg.render_retention(), Retention::Since(TickId(40)));
    }

    #[test]
    fn error_display_and_source() {
        let err = ConfigError::from(PipelineError::EmptyPipeline);
        assert_eq!(err.to_string(), "pipeline: pipeline has no propagators");
        assert!(err.source().is_some());
        assert!(ConfigError::NoFields.source().is_none());
    }
}
