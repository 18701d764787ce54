//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a field within a simulation.
///
/// Fields are registered when the engine is built and assigned sequential
/// IDs. `FieldId(n)` corresponds to the n-th entry of the field list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Time index of a lattice slice.
///
/// Ticks are 1-based: `TickId(1)` is the seeded initial state and the
/// stepper produces `TickId(2)` through the configured horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The seeded initial slice.
    pub const INITIAL: TickId = TickId(1);

    /// The tick immediately after this one.
    pub fn next(self) -> TickId {
        TickId(self.0 + 1)
    }

    /// The tick immediately before this one, or `None` at tick 0.
    pub fn prev(self) -> Option<TickId> {
        self.0.checked_sub(1).map(TickId)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_neighbours() {
        assert_eq!(TickId(3).next(), TickId(4));
        assert_eq!(TickId(3).prev(), Some(TickId(2)));
        assert_eq!(TickId(0).prev(), None);
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(FieldId(7).to_string(), "7");
        assert_eq!(TickId::INITIAL.to_string(), "1");
    }
}
