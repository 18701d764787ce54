//! Pipeline validation and read resolution planning.
//!
//! [`validate_pipeline`] runs once at engine startup to check the propagator
//! list for structural errors and build the [`ReadResolutionPlan`], a
//! precomputed routing table the engine consults on every tick.

use indexmap::IndexMap;
use lynx_core::{FieldDef, FieldId, FieldKind, FieldSet};

use crate::propagator::Propagator;

use std::error::Error;
use std::fmt;

// ── Read resolution ────────────────────────────────────────────────

/// Where a propagator's overlay read of a field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    /// Slice `t - 1` of a state field.
    Previous,
    /// The staged write buffer of an earlier propagator in this tick.
    Staged {
        /// Index of the writing propagator in the pipeline.
        writer_index: usize,
    },
}

/// Precomputed routing table mapping each `(propagator, field)` overlay
/// read to its [`ReadSource`], plus the writer of every field.
///
/// Built once by [`validate_pipeline`].
#[derive(Debug)]
#[must_use]
pub struct ReadResolutionPlan {
    /// `routes[propagator_index]` maps `FieldId → ReadSource`.
    routes: Vec<IndexMap<FieldId, ReadSource>>,
    /// Field → index of the propagator that writes it.
    writers: IndexMap<FieldId, usize>,
}

impl ReadResolutionPlan {
    /// Number of propagators in the plan.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the plan covers zero propagators.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Look up the read source for a field in a given propagator's context.
    pub fn source(&self, propagator_index: usize, field: FieldId) -> Option<ReadSource> {
        self.routes.get(propagator_index)?.get(&field).copied()
    }

    /// All `(field, source)` pairs for a propagator.
    pub fn routes_for(&self, propagator_index: usize) -> Option<&IndexMap<FieldId, ReadSource>> {
        self.routes.get(propagator_index)
    }

    /// Index of the propagator that writes `field`, if any.
    pub fn writer_of(&self, field: FieldId) -> Option<usize> {
        self.writers.get(&field).copied()
    }
}

// ── Errors ─────────────────────────────────────────────────────────

/// A detected write-write conflict between two propagators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteConflict {
    /// The contested field.
    pub field_id: FieldId,
    /// Name of the first writer (earlier in pipeline order).
    pub first_writer: String,
    /// Name of the second writer (later in pipeline order).
    pub second_writer: String,
}

/// Errors from pipeline validation (startup-time, not per-tick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No propagators registered.
    EmptyPipeline,

    /// Two or more propagators write the same field.
    WriteConflict(Vec<WriteConflict>),

    /// A propagator references a field not defined in the world.
    UndefinedField {
        /// Which propagator.
        propagator: String,
        /// The missing field.
        field_id: FieldId,
    },

    /// A propagator asks for the previous slice of a derived field.
    DerivedReadPrevious {
        /// Which propagator.
        propagator: String,
        /// The derived field.
        field_id: FieldId,
    },

    /// A propagator reads a derived field before anything stages it.
    UnstagedRead {
        /// Which propagator.
        propagator: String,
        /// The derived field.
        field_id: FieldId,
    },

    /// A state field has no writer, so its next slice would be empty.
    StateNotWritten {
        /// The unwritten state field.
        field_id: FieldId,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no propagators"),
            Self::WriteConflict(conflicts) => {
                write!(f, "write-write conflicts: ")?;
                for (i, c) in conflicts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "field {} written by '{}' and '{}'",
                        c.field_id, c.first_writer, c.second_writer,
                    )?;
                }
                Ok(())
            }
            Self::UndefinedField {
                propagator,
                field_id,
            } => write!(
                f,
                "propagator '{propagator}' references undefined field {field_id}"
            ),
            Self::DerivedReadPrevious {
                propagator,
                field_id,
            } => write!(
                f,
                "propagator '{propagator}' reads previous slice of derived field {field_id}"
            ),
            Self::UnstagedRead {
                propagator,
                field_id,
            } => write!(
                f,
                "propagator '{propagator}' reads derived field {field_id} \
                 before any earlier propagator writes it"
            ),
            Self::StateNotWritten { field_id } => {
                write!(f, "state field {field_id} is never written")
            }
        }
    }
}

impl Error for PipelineError {}

// ── Validation ─────────────────────────────────────────────────────

/// Validate a propagator pipeline and build the [`ReadResolutionPlan`].
///
/// `fields[i]` defines `FieldId(i)`. Checks performed:
///
/// 1. Pipeline is non-empty.
/// 2. No write-write conflicts.
/// 3. All referenced field IDs are defined.
/// 4. `reads_previous()` names only state fields.
/// 5. Every overlay read of a derived field has an earlier writer.
/// 6. Every state field is written by some propagator.
pub fn validate_pipeline(
    propagators: &[Box<dyn Propagator>],
    fields: &[FieldDef],
) -> Result<ReadResolutionPlan, PipelineError> {
    // 1. Non-empty
    if propagators.is_empty() {
        return Err(PipelineError::EmptyPipeline);
    }

    // 2. Write-write conflicts
    {
        let mut last_writer: IndexMap<FieldId, usize> = IndexMap::new();
        let mut conflicts: Vec<WriteConflict> = Vec::new();

        for (i, prop) in propagators.iter().enumerate() {
            for field_id in prop.writes().iter() {
                if let Some(&j) = last_writer.get(&field_id) {
                    conflicts.push(WriteConflict {
                        field_id,
                        first_writer: propagators[j].name().to_string(),
                        second_writer: prop.name().to_string(),
                    });
                }
                last_writer.insert(field_id, i);
            }
        }
        if !conflicts.is_empty() {
            return Err(PipelineError::WriteConflict(conflicts));
        }
    }

    // 3. Field reference existence
    let kind_of = |field: FieldId| fields.get(field.0 as usize).map(|def| def.kind);
    for prop in propagators {
        let referenced = prop
            .reads()
            .union(&prop.reads_previous())
            .union(&prop.writes());
        if let Some(field_id) = referenced.iter().find(|&f| kind_of(f).is_none()) {
            return Err(PipelineError::UndefinedField {
                propagator: prop.name().to_string(),
                field_id,
            });
        }
    }

    // 4. Previous slices exist only for state fields
    for prop in propagators {
        if let Some(field_id) = prop
            .reads_previous()
            .iter()
            .find(|&f| kind_of(f) == Some(FieldKind::Derived))
        {
            return Err(PipelineError::DerivedReadPrevious {
                propagator: prop.name().to_string(),
                field_id,
            });
        }
    }

    // 5. Build routes; derived reads must be staged first
    let mut writers: IndexMap<FieldId, usize> = IndexMap::new();
    let mut routes: Vec<IndexMap<FieldId, ReadSource>> = Vec::with_capacity(propagators.len());

    for (i, prop) in propagators.iter().enumerate() {
        let mut prop_routes = IndexMap::new();
        for field_id in prop.reads().iter() {
            let source = match writers.get(&field_id) {
                Some(&j) => ReadSource::Staged { writer_index: j },
                None if kind_of(field_id) == Some(FieldKind::Derived) => {
                    return Err(PipelineError::UnstagedRead {
                        propagator: prop.name().to_string(),
                        field_id,
                    });
                }
                None => ReadSource::Previous,
            };
            prop_routes.insert(field_id, source);
        }
        routes.push(prop_routes);

        for field_id in prop.writes().iter() {
            writers.insert(field_id, i);
        }
    }

    // 6. Every state field gets a new slice
    let state_fields: FieldSet = fields
        .iter()
        .enumerate()
        .filter(|(_, def)| def.kind == FieldKind::State)
        .map(|(i, _)| FieldId(i as u32))
        .collect();
    if let Some(field_id) = state_fields.iter().find(|f| !writers.contains_key(f)) {
        return Err(PipelineError::StateNotWritten { field_id });
    }

    Ok(ReadResolutionPlan { routes, writers })
}
