//! Coupling, reaction and noise operators for Lynx predator-prey
//! simulations.
//!
//! # Pipeline order (each tick `t`)
//!
//! 1. [`Coupling`]: reads_previous(prey, predator) → writes(prey_coupling, predator_coupling)
//! 2. [`PreyReaction`]: reads_previous(prey, predator), reads(prey_coupling) → writes(prey)
//! 3. [`PredatorReaction`]: reads_previous(prey, predator), reads(predator_coupling) → writes(predator)
//!
//! [`NoiseInjection`] is not part of the tick pipeline; it perturbs the
//! seeded slice once before the first tick.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod coupling;
pub mod fields;
pub mod noise;
pub mod reaction;

pub use coupling::{laplacian, Coupling};
pub use fields::{lotka_fields, PREDATOR, PREDATOR_COUPLING, PREY, PREY_COUPLING};
pub use noise::{NoiseInjection, NOISE_STREAM};
pub use reaction::{floor_at_zero, predator_update, prey_update, PredatorReaction, PreyReaction};
