//! The [`Propagator`] trait.
//!
//! Propagators are stateless operators executed in sequence each tick.
//! They declare field dependencies up front so the engine can validate
//! the pipeline and precompute read routing before the first tick.

use crate::context::StepContext;
use lynx_core::{FieldSet, PropagatorError};

/// A stateless operator in the per-tick pipeline.
///
/// # Contract
///
/// - `step()` MUST be deterministic: same inputs produce identical outputs.
/// - `&self`: propagators hold only their parameters; evolving state lives
///   in fields.
/// - `reads()`, `reads_previous()` and `writes()` are called once at
///   startup, not per tick.
/// - Every declared write buffer arrives zero-filled over the padded
///   extent. Propagators fill the interior; the ghost ring of state fields
///   is owned by the boundary synchronizer.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores propagators as
/// `Vec<Box<dyn Propagator>>`.
///
/// # Examples
///
/// A propagator that fills a field with a constant value:
///
/// ```
/// use lynx_propagator::{Propagator, StepContext};
/// use lynx_core::{FieldId, FieldSet, PropagatorError};
///
/// struct ConstantFill {
///     field: FieldId,
///     value: f64,
/// }
///
/// impl Propagator for ConstantFill {
///     fn name(&self) -> &str { "constant_fill" }
///
///     fn reads(&self) -> FieldSet { FieldSet::empty() }
///
///     fn writes(&self) -> FieldSet {
///         [self.field].into_iter().collect()
///     }
///
///     fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
///         let buf = ctx
///             .writes()
///             .write(self.field)
///             .ok_or(PropagatorError::FieldNotWritable { field_id: self.field })?;
///         buf.fill(self.value);
///         Ok(())
///     }
/// }
///
/// let prop = ConstantFill { field: FieldId(0), value: 0.5 };
/// assert_eq!(prop.name(), "constant_fill");
/// ```
pub trait Propagator: Send + 'static {
    /// Human-readable name for error reporting and logs.
    fn name(&self) -> &str;

    /// Fields this propagator reads via the in-tick overlay view.
    ///
    /// Reading through `ctx.reads()` sees buffers staged by earlier
    /// propagators in the current tick, or the previous slice of a state
    /// field that no earlier propagator wrote.
    fn reads(&self) -> FieldSet;

    /// Fields this propagator reads from the previous tick's slice.
    ///
    /// Reading through `ctx.reads_previous()` always sees slice `t - 1`
    /// regardless of writes earlier in the tick. Only state fields have a
    /// previous slice.
    ///
    /// Default: empty set.
    fn reads_previous(&self) -> FieldSet {
        FieldSet::empty()
    }

    /// Fields this propagator writes this tick.
    fn writes(&self) -> FieldSet;

    /// Execute the propagator for one tick.
    ///
    /// Called once per tick in pipeline order.
    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError>;
}
