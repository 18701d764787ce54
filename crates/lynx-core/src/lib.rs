//! Core types and traits for the Lynx lattice simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, field descriptors, error types, and field-access
//! traits shared by every other crate in the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod traits;

pub use error::{PropagatorError, StepError};
pub use field::{FieldDef, FieldKind, FieldSet};
pub use id::{FieldId, TickId};
pub use traits::{FieldReader, FieldWriter, SnapshotAccess};
