//! Warm-start persistence for Lynx simulations.
//!
//! Saves the final slice of each state field as a delimited text table
//! and loads it back as tick 1 of a later run.
//!
//! # Architecture
//!
//! - [`TableCodec`] encodes a padded slice as one delimited line per row
//! - [`SnapshotStore`] loads and saves slices by key
//! - [`DirStore`] maps each key to `<dir>/<key>.txt`
//! - [`MemoryStore`] keeps encoded tables in memory
//! - [`snapshot_hash`] fingerprints persisted state
//!
//! # Format
//!
//! ```text
//! 0.12|0.5|...|0.12      <- padded row 0
//! ...
//! 0.31|0.07|...|0.31     <- padded row n + 1
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;
pub mod store;

pub use codec::{TableCodec, DEFAULT_DELIMITER};
pub use error::StoreError;
pub use hash::snapshot_hash;
pub use store::{DirStore, MemoryStore, SnapshotStore};
