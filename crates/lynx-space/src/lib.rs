//! Padded periodic lattice storage for Lynx simulations.
//!
//! The simulated domain is an `n x n` torus. Each slice is stored with a
//! one-cell ring of ghost cells so that 4-neighbour stencils never need
//! special-cased edge arithmetic:
//!
//! ```text
//!  padding   interior   padding
//!     0     1 ..... n    n+1
//! ```
//!
//! - [`GridIndexing`]: the addressing policy (domain size, padding width,
//!   flat row-major index arithmetic)
//! - [`PaddedGrid`]: one owned slice over the padded extent
//! - [`wrap`]: the boundary synchronizer that mirrors opposite interior
//!   edges into the ghost ring

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod indexing;
pub mod wrap;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::SpaceError;
pub use grid::PaddedGrid;
pub use indexing::GridIndexing;
pub use wrap::{first_unsynchronized, is_synchronized, synchronize, synchronize_slice};
