//! Core abstraction traits for field access and snapshot reading.

use crate::id::{FieldId, TickId};

/// Read-only access to field data within a simulation step.
///
/// Each field is a flat, row-major padded lattice slice. Returns `None`
/// if the field is not readable in the current context.
pub trait FieldReader {
    /// Read the data for a field as a flat `f64` slice.
    fn read(&self, field: FieldId) -> Option<&[f64]>;
}

/// Mutable access to field data within a simulation step.
///
/// Returns `None` if the field is not writable in the current context.
pub trait FieldWriter {
    /// Get a mutable slice for writing field data.
    fn write(&mut self, field: FieldId) -> Option<&mut [f64]>;
}

/// Read-only access to the slices of one tick.
///
/// Consumers outside the stepper (the warm-start store, the visualization
/// sink) read through this trait rather than the engine's history type.
pub trait SnapshotAccess {
    /// Read a field's padded slice for this tick.
    fn read_field(&self, field: FieldId) -> Option<&[f64]>;

    /// The tick this snapshot belongs to.
    fn tick_id(&self) -> TickId;
}
