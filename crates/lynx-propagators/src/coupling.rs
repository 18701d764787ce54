//! Discrete Laplacian coupling propagator.
//!
//! Computes the 5-point Laplacian of each source field's previous slice
//! into a derived coupling buffer:
//!
//! ```text
//! L[i,j] = f[i-1,j] + f[i+1,j] + f[i,j-1] + f[i,j+1] - 4 f[i,j]
//! ```
//!
//! Only interior cells are written. Neighbours of edge cells are read
//! from the ghost ring, so the previous slice must be synchronized first;
//! the tick engine does this before running the pipeline.
//!
//! Constructed via the builder pattern: [`Coupling::builder`].

use crate::fields::{PREDATOR, PREDATOR_COUPLING, PREY, PREY_COUPLING};
use lynx_core::{FieldId, FieldSet, PropagatorError};
use lynx_propagator::{Propagator, StepContext};
use lynx_space::GridIndexing;
use smallvec::SmallVec;

/// Write the Laplacian of `src` into the interior of `dst`.
///
/// Padding cells of `dst` are left untouched.
///
/// # Panics
///
/// Panics if either buffer is shorter than [`GridIndexing::cell_count`].
pub fn laplacian(indexing: GridIndexing, src: &[f64], dst: &mut [f64]) {
    let padded = indexing.padded_size();
    for r in indexing.interior_range() {
        let row = r * padded;
        for c in indexing.interior_range() {
            let i = row + c;
            dst[i] = src[i - padded] + src[i + padded] + src[i - 1] + src[i + 1] - 4.0 * src[i];
        }
    }
}

/// Computes the coupling term of one or more state fields.
///
/// # Construction
///
/// ```
/// use lynx_core::FieldId;
/// use lynx_propagators::Coupling;
///
/// let prop = Coupling::builder()
///     .pair(FieldId(0), FieldId(2))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct Coupling {
    pairs: SmallVec<[(FieldId, FieldId); 2]>,
}

/// Builder for [`Coupling`].
///
/// At least one `(source, target)` pair is required.
pub struct CouplingBuilder {
    pairs: SmallVec<[(FieldId, FieldId); 2]>,
}

impl Coupling {
    /// Create a new builder.
    pub fn builder() -> CouplingBuilder {
        CouplingBuilder {
            pairs: SmallVec::new(),
        }
    }

    /// Coupling of prey and predator into their standard buffers.
    pub fn lotka() -> Self {
        Self {
            pairs: SmallVec::from_buf([(PREY, PREY_COUPLING), (PREDATOR, PREDATOR_COUPLING)]),
        }
    }

    /// Configured `(source, target)` pairs in evaluation order.
    pub fn pairs(&self) -> &[(FieldId, FieldId)] {
        &self.pairs
    }
}

impl CouplingBuilder {
    /// Add a source field and the buffer its Laplacian is written to.
    pub fn pair(mut self, source: FieldId, target: FieldId) -> Self {
        self.pairs.push((source, target));
        self
    }

    /// Build the propagator, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - no pair was added
    /// - a target equals any source
    /// - two pairs share a target
    pub fn build(self) -> Result<Coupling, String> {
        if self.pairs.is_empty() {
            return Err("at least one (source, target) pair is required".to_string());
        }
        let sources: FieldSet = self.pairs.iter().map(|&(s, _)| s).collect();
        let mut targets = FieldSet::empty();
        for &(_, target) in &self.pairs {
            if sources.contains(target) {
                return Err(format!("field {target} is both a source and a target"));
            }
            if targets.contains(target) {
                return Err(format!("field {target} is targeted twice"));
            }
            targets.insert(target);
        }
        Ok(Coupling { pairs: self.pairs })
    }
}

impl Propagator for Coupling {
    fn name(&self) -> &str {
        "Coupling"
    }

    fn reads(&self) -> FieldSet {
        FieldSet::empty()
    }

    fn reads_previous(&self) -> FieldSet {
        self.pairs.iter().map(|&(s, _)| s).collect()
    }

    fn writes(&self) -> FieldSet {
        self.pairs.iter().map(|&(_, t)| t).collect()
    }

    fn step(&self, ctx: &mut StepContext<'_>) -> Result<(), PropagatorError> {
        let grid = ctx.grid();
        for &(source, target) in &self.pairs {
            let prev = ctx.read_previous_checked(source)?;
            let out = ctx
                .writes()
                .write(target)
                .ok_or(PropagatorError::FieldNotWritable { field_id: target })?;
            if out.len() != grid.cell_count() {
                return Err(PropagatorError::LengthMismatch {
                    field_id: target,
                    expected: grid.cell_count(),
                    actual: out.len(),
                });
            }
            laplacian(grid, prev, out);
        }
        Ok(())
    }
}
