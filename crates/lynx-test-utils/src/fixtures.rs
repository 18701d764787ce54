//! Reusable propagator test fixtures.
//!
//! - [`HoldPropagator`]: copies each state field's previous slice forward.
//! - [`ConstPropagator`]: writes a constant value into every output.
//! - [`FailingPropagator`]: fails deterministically after N calls.
//! - [`PoisonPropagator`]: holds its fields and injects a non-finite value.

use lynx_core::{FieldId, FieldSet, PropagatorError};
use lynx_propagator::{Propagator, StepContext};
use std::sync::atomic::{AtomicUsize, Ordering};

fn not_writable(field: FieldId) -> PropagatorError {
    PropagatorError::FieldNotWritable { field_id: field }
}

fn copy_previous(ctx: &mut StepContext<'_>, field: FieldId) -> Result<(), PropagatorError> {
    let prev = ctx.read_previous_checked(field)?;
    let out = ctx.writes().write(field).ok_or(not_writable(field))?;
    out.copy_from_slice(prev);
    Ok(())
}

/// Copies the previous slice of each listed state field into its new slice.
///
/// A pipeline of one `HoldPropagator` over every state field keeps the
/// whole world frozen, which isolates engine bookkeeping from dynamics.
pub struct HoldPropagator {
    pub name: String,
    pub fields: Vec<FieldId>,
}

impl HoldPropagator {
    pub fn new(name: impl Into<String>, fields: &[FieldId]) -> Self {
        Self {
            name: name.into(),
            fields: fields.to_vec(),
        }
    }
}

impl Propagator for HoldPropagator {
    fn name(&self) -> &str {
        &self.name
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
    }

    fn reads_previous(&self) -> FieldSet {
        self.fields.iter().copied().collect()
    }

    fn writes(&self) -> FieldSet {
        self.fields.iter().copied().collect()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        for &field in &self.fields {
            copy_previous(ctx, field)?;
        }
        Ok(())
    }
}

/// Writes a constant value to all cells of each output (no reads).
pub struct ConstPropagator {
    pub name: String,
    pub outputs: Vec<FieldId>,
    pub value: f64,
}

impl ConstPropagator {
    pub fn new(name: impl Into<String>, outputs: &[FieldId], value: f64) -> Self {
        Self {
            name: name.into(),
            outputs: outputs.to_vec(),
            value,
        }
    }
}

impl Propagator for ConstPropagator {
    fn name(&self) -> &str {
        &self.name
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
    }

    fn writes(&self) -> FieldSet {
        self.outputs.iter().copied().collect()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        for &field in &self.outputs {
            ctx.writes()
                .write(field)
                .ok_or(not_writable(field))?
                .fill(self.value);
        }
        Ok(())
    }
}

/// Fails deterministically after a configurable number of successful calls.
///
/// Uses `AtomicUsize` for the call counter so it satisfies `Send`.
pub struct FailingPropagator {
    pub name: String,
    pub outputs: Vec<FieldId>,
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingPropagator {
    /// Create a propagator that succeeds `succeed_count` times then fails.
    pub fn new(name: impl Into<String>, outputs: &[FieldId], succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            outputs: outputs.to_vec(),
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `step()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Propagator for FailingPropagator {
    fn name(&self) -> &str {
        &self.name
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
    }

    fn writes(&self) -> FieldSet {
        self.outputs.iter().copied().collect()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(PropagatorError::ExecutionFailed {
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        for &field in &self.outputs {
            if let Some(out) = ctx.writes().write(field) {
                out.fill(n as f64);
            }
        }
        Ok(())
    }
}

/// Holds its fields like [`HoldPropagator`], then writes `value` into
/// interior cell `cell` of `target` from tick `from_tick` onwards.
pub struct PoisonPropagator {
    pub hold: HoldPropagator,
    pub target: FieldId,
    pub cell: (usize, usize),
    pub value: f64,
    pub from_tick: u64,
}

impl PoisonPropagator {
    pub fn new(
        fields: &[FieldId],
        target: FieldId,
        cell: (usize, usize),
        value: f64,
        from_tick: u64,
    ) -> Self {
        Self {
            hold: HoldPropagator::new("poison", fields),
            target,
            cell,
            value,
            from_tick,
        }
    }
}

impl Propagator for PoisonPropagator {
    fn name(&self) -> &str {
        self.hold.name()
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
    }

    fn reads_previous(&self) -> FieldSet {
        self.hold.reads_previous()
    }

    fn writes(&self) -> FieldSet {
        self.hold.writes()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        self.hold.step(ctx)?;
        if ctx.tick_id().0 >= self.from_tick {
            let i = ctx.grid().index(self.cell.0, self.cell.1);
            let out = ctx
                .writes()
                .write(self.target)
                .ok_or(not_writable(self.target))?;
            out[i] = self.value;
        }
        Ok(())
    }
}
