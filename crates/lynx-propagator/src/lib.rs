//! Propagator trait and step context for Lynx simulations.
//!
//! The [`Propagator`] trait defines the `&self` step function with a
//! split-borrow [`StepContext`] for reads/reads_previous/writes access.
//! [`validate_pipeline`] checks a propagator list once at startup and
//! produces the [`ReadResolutionPlan`] the engine routes reads with.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod guard;
pub mod pipeline;
pub mod propagator;

pub use context::StepContext;
pub use guard::FullWriteGuard;
pub use pipeline::{validate_pipeline, PipelineError, ReadResolutionPlan, ReadSource, WriteConflict};
pub use propagator::Propagator;
