//! Error types raised while stepping a simulation.
//!
//! Configuration and persistence errors live with the crates that own
//! those concerns (`lynx-engine`, `lynx-store`); this module holds the
//! per-tick failures shared by the engine and every propagator.

use crate::id::{FieldId, TickId};
use std::error::Error;
use std::fmt;

/// Errors from the tick engine while advancing one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A propagator returned an error during execution.
    PropagatorFailed {
        /// Name of the failing propagator.
        name: String,
        /// The underlying propagator error.
        reason: PropagatorError,
    },
    /// A state field produced a non-finite value and the divergence
    /// policy is set to abort.
    NumericDivergence {
        /// Name of the diverging field.
        field: String,
        /// Tick whose slice holds the value.
        tick: TickId,
        /// Padded `(row, col)` of the first non-finite cell.
        cell: (usize, usize),
        /// The offending value (NaN or ±inf).
        value: f64,
    },
    /// The configured horizon has already been reached.
    HorizonReached {
        /// The last tick of the run.
        horizon: TickId,
    },
    /// A slice required by the tick is not held in history.
    MissingSlice {
        /// The absent field.
        field_id: FieldId,
        /// The tick that was requested.
        tick: TickId,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PropagatorFailed { name, reason } => {
                write!(f, "propagator '{name}' failed: {reason}")
            }
            Self::NumericDivergence {
                field,
                tick,
                cell,
                value,
            } => write!(
                f,
                "field '{field}' diverged at tick {tick}, cell ({}, {}): {value}",
                cell.0, cell.1
            ),
            Self::HorizonReached { horizon } => {
                write!(f, "horizon {horizon} already reached")
            }
            Self::MissingSlice { field_id, tick } => {
                write!(f, "field {field_id} has no slice for tick {tick}")
            }
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PropagatorFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Errors from individual propagator execution.
///
/// Returned by `Propagator::step()` and wrapped in
/// [`StepError::PropagatorFailed`] by the tick engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropagatorError {
    /// A field was read that is not in the propagator's declared read set
    /// (or has no data for this tick).
    FieldNotReadable {
        /// The field that could not be read.
        field_id: FieldId,
    },
    /// A field was written that is not in the propagator's declared write set.
    FieldNotWritable {
        /// The field that could not be written.
        field_id: FieldId,
    },
    /// A buffer did not have the padded-grid length the propagator expects.
    LengthMismatch {
        /// The field whose buffer is the wrong size.
        field_id: FieldId,
        /// Expected number of cells.
        expected: usize,
        /// Actual number of cells.
        actual: usize,
    },
    /// The propagator's step function failed for another reason.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for PropagatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldNotReadable { field_id } => write!(f, "field {field_id} not readable"),
            Self::FieldNotWritable { field_id } => write!(f, "field {field_id} not writable"),
            Self::LengthMismatch {
                field_id,
                expected,
                actual,
            } => write!(
                f,
                "field {field_id} has {actual} cells, expected {expected}"
            ),
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for PropagatorError {}
