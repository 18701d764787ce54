//! Field constants and definitions for the predator-prey pipeline.

use lynx_core::{FieldDef, FieldId};

/// Prey density `X` (state).
pub const PREY: FieldId = FieldId(0);
/// Predator density `Y` (state).
pub const PREDATOR: FieldId = FieldId(1);
/// Discrete Laplacian of prey at `t - 1` (derived).
pub const PREY_COUPLING: FieldId = FieldId(2);
/// Discrete Laplacian of predator at `t - 1` (derived).
pub const PREDATOR_COUPLING: FieldId = FieldId(3);

/// Returns the four field definitions in [`FieldId`] order.
///
/// The state field names double as warm-start store keys.
pub fn lotka_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::state("prey"),
        FieldDef::state("predator"),
        FieldDef::derived("prey_coupling"),
        FieldDef::derived("predator_coupling"),
    ]
}
