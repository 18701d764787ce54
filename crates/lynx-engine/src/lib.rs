//! Time stepper for Lynx predator–prey simulations.
//!
//! Provides [`LockstepWorld`], which owns the field history and drives the
//! propagator pipeline one tick at a time, together with the
//! configuration, seeding and reporting types around it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod history;
pub mod lockstep;
pub mod metrics;
pub(crate) mod overlay;
pub mod progress;
pub mod seed;
pub mod stats;
pub mod tick;

pub use config::{
    delimiter_collides, ColdStartRange, ConfigError, DivergencePolicy, SimulationConfig,
    WorldConfig,
};
pub use history::{FieldHistory, Retention, Slice};
pub use lockstep::{LockstepWorld, StepResult};
pub use metrics::StepMetrics;
pub use progress::ProgressMeter;
pub use seed::InitialState;
pub use stats::FieldStats;
pub use tick::{TickEngine, TickResult};
