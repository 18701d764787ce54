//! Execution context passed to propagators during tick execution.
//!
//! [`StepContext`] provides split-borrow field access through two read views
//! (in-tick overlay and previous slice) plus mutable write access and the
//! lattice addressing policy.

use lynx_core::{FieldId, FieldReader, FieldWriter, PropagatorError, TickId};
use lynx_space::GridIndexing;

/// Execution context passed to each propagator's `step()` method.
///
/// Uses dynamic dispatch (`&dyn FieldReader`, `&mut dyn FieldWriter`) to
/// keep the [`Propagator`](crate::Propagator) trait object-safe while
/// supporting mock-based testing.
///
/// # Split-borrow semantics
///
/// - **`reads()`** returns the in-tick overlay view. A propagator reading
///   field X sees the buffer staged by the earlier propagator that wrote
///   X this tick, or slice `t - 1` if none did.
///
/// - **`reads_previous()`** returns slice `t - 1`, ignoring anything
///   written earlier in the tick.
pub struct StepContext<'a> {
    reads: &'a dyn FieldReader,
    reads_previous: &'a dyn FieldReader,
    writes: &'a mut dyn FieldWriter,
    grid: GridIndexing,
    tick_id: TickId,
}

impl<'a> StepContext<'a> {
    /// Construct a new step context.
    ///
    /// Typically called by the engine, not by propagators directly.
    /// For testing, construct with mock readers/writers from `lynx-test-utils`.
    pub fn new(
        reads: &'a dyn FieldReader,
        reads_previous: &'a dyn FieldReader,
        writes: &'a mut dyn FieldWriter,
        grid: GridIndexing,
        tick_id: TickId,
    ) -> Self {
        Self {
            reads,
            reads_previous,
            writes,
            grid,
            tick_id,
        }
    }

    /// In-tick overlay reader.
    ///
    /// The returned reader outlives this borrow of the context, so read
    /// slices can be held while writing.
    pub fn reads(&self) -> &'a dyn FieldReader {
        self.reads
    }

    /// Previous-slice reader.
    pub fn reads_previous(&self) -> &'a dyn FieldReader {
        self.reads_previous
    }

    /// Mutable field writer for the current propagator's declared outputs.
    pub fn writes(&mut self) -> &mut dyn FieldWriter {
        self.writes
    }

    /// Addressing policy of every slice in this tick.
    pub fn grid(&self) -> GridIndexing {
        self.grid
    }

    /// Tick being produced.
    pub fn tick_id(&self) -> TickId {
        self.tick_id
    }

    /// Overlay read that fails with a typed error and checks the length.
    pub fn read_checked(&self, field: FieldId) -> Result<&'a [f64], PropagatorError> {
        let reader = self.reads;
        let data = reader
            .read(field)
            .ok_or(PropagatorError::FieldNotReadable { field_id: field })?;
        self.check_len(field, data.len())?;
        Ok(data)
    }

    /// Previous-slice read that fails with a typed error and checks the length.
    pub fn read_previous_checked(&self, field: FieldId) -> Result<&'a [f64], PropagatorError> {
        let reader = self.reads_previous;
        let data = reader
            .read(field)
            .ok_or(PropagatorError::FieldNotReadable { field_id: field })?;
        self.check_len(field, data.len())?;
        Ok(data)
    }

    fn check_len(&self, field: FieldId, actual: usize) -> Result<(), PropagatorError> {
        let expected = self.grid.cell_count();
        if actual != expected {
            return Err(PropagatorError::LengthMismatch {
                field_id: field,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_test_utils::{MockFieldReader, MockFieldWriter};

    fn grid1() -> GridIndexing {
        GridIndexing::new(1).unwrap()
    }

    #[test]
    fn context_provides_reads_and_writes() {
        let field_a = FieldId(0);
        let mut reader = MockFieldReader::new();
        reader.set_field(field_a, vec![1.0; 9]);
        let mut writer = MockFieldWriter::new();
        writer.add_field(field_a, 9);

        let mut ctx = StepContext::new(&reader, &reader, &mut writer, grid1(), TickId(2));

        assert_eq!(ctx.reads().read(field_a).unwrap(), &[1.0; 9]);
        let out = ctx.writes().write(field_a).unwrap();
        out[4] = 10.0;

        assert_eq!(ctx.tick_id(), TickId(2));
        assert_eq!(ctx.grid().padded_size(), 3);
        assert_eq!(writer.get_field(field_a).unwrap()[4], 10.0);
    }

    #[test]
    fn split_borrow_reads_vs_reads_previous() {
        let field_a = FieldId(0);

        let mut overlay = MockFieldReader::new();
        overlay.set_field(field_a, vec![10.0; 9]);

        let mut base = MockFieldReader::new();
        base.set_field(field_a, vec![1.0; 9]);

        let mut writer = MockFieldWriter::new();
        let ctx = StepContext::new(&overlay, &base, &mut writer, grid1(), TickId(2));

        assert_eq!(ctx.reads().read(field_a).unwrap()[0], 10.0);
        assert_eq!(ctx.reads_previous().read(field_a).unwrap()[0], 1.0);
    }

    #[test]
    fn checked_reads_report_missing_and_short_fields() {
        let mut reader = MockFieldReader::new();
        reader.set_field(FieldId(0), vec![0.0; 4]);
        let mut writer = MockFieldWriter::new();
        let ctx = StepContext::new(&reader, &reader, &mut writer, grid1(), TickId(2));

        assert_eq!(
            ctx.read_checked(FieldId(1)),
            Err(PropagatorError::FieldNotReadable {
                field_id: FieldId(1)
            })
        );
        assert_eq!(
            ctx.read_previous_checked(FieldId(0)),
            Err(PropagatorError::LengthMismatch {
                field_id: FieldId(0),
                expected: 9,
                actual: 4
            })
        );
    }
}
