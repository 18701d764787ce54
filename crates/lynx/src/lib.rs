//! Lynx: a predator–prey simulator on a periodic lattice.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Lynx sub-crates and provides [`run`], the load → simulate → save → render
//! sequence behind the `lynx` binary.
//!
//! # Quick start
//!
//! ```rust
//! use lynx::prelude::*;
//!
//! let cfg = SimulationConfig { domain_size: 8, horizon: 10, ..Default::default() };
//! let initial = InitialState::lotka_cold(&cfg).unwrap();
//! let mut world = LockstepWorld::new(cfg.world_config(Retention::Rolling).unwrap(), initial).unwrap();
//! let mut progress = ProgressMeter::new("simulation", world.remaining(), 2);
//! let last = world.run_to_horizon(&mut progress).unwrap();
//! assert_eq!(last.tick_id(), TickId(10));
//! let prey = FieldStats::of(last.grid(PREY).unwrap());
//! assert!(prey.min >= 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lynx-core` | IDs, field definitions, errors, core traits |
//! | [`space`] | `lynx-space` | Padded lattice storage and boundary synchronization |
//! | [`propagator`] | `lynx-propagator` | Propagator trait and pipeline validation |
//! | [`propagators`] | `lynx-propagators` | Coupling, reactions, noise injection |
//! | [`engine`] | `lynx-engine` | Configuration, tick engine, history, progress |
//! | [`store`] | `lynx-store` | Warm-start tables |
//! | [`render`] | `lynx-render` | Heatmap frames and GIF output |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod run;

/// Core types, traits, and IDs (`lynx-core`).
pub use lynx_core as types;

/// Padded periodic lattice storage (`lynx-space`).
///
/// [`space::GridIndexing`] centralizes padding arithmetic;
/// [`space::synchronize`] refreshes the ghost ring.
pub use lynx_space as space;

/// Propagator trait and pipeline validation (`lynx-propagator`).
pub use lynx_propagator as propagator;

/// The predator–prey propagators (`lynx-propagators`).
pub use lynx_propagators as propagators;

/// Simulation configuration and engines (`lynx-engine`).
pub use lynx_engine as engine;

/// Warm-start persistence (`lynx-store`).
pub use lynx_store as store;

/// Visualization sink (`lynx-render`).
pub use lynx_render as render;

pub use run::{run, RunConfig, RunError, RunSummary};

/// Common imports for typical Lynx usage.
///
/// ```rust
/// use lynx::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use lynx_core::{
        FieldDef, FieldId, FieldKind, FieldReader, FieldSet, FieldWriter, SnapshotAccess, TickId,
    };

    // Errors
    pub use lynx_core::{PropagatorError, StepError};

    // Space
    pub use lynx_space::{synchronize, GridIndexing, PaddedGrid};

    // Propagator
    pub use lynx_propagator::{Propagator, StepContext};

    // Propagators
    pub use lynx_propagators::{PREDATOR, PREY};

    // Engine
    pub use lynx_engine::{
        ColdStartRange, DivergencePolicy, FieldStats, InitialState, LockstepWorld, ProgressMeter,
        Retention, SimulationConfig, Slice, StepMetrics, StepResult, WorldConfig,
    };

    // Persistence and output
    pub use lynx_render::{FrameLayout, FrameSink, GifSink};
    pub use lynx_store::{DirStore, SnapshotStore, TableCodec};

    // Runner
    pub use crate::run::{run, RunConfig, RunError, RunSummary};
}
