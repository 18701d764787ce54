//! Field definitions and the [`FieldSet`] bitset.

use crate::id::FieldId;

/// How a field's values live across ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Persistent state with one slice per retained tick (prey, predator).
    ///
    /// Readable from the previous tick and must be written every tick.
    State,
    /// Ephemeral per-tick buffer (coupling terms).
    ///
    /// Only visible to later propagators within the tick that wrote it;
    /// never retained in history nor persisted.
    Derived,
}

/// Definition of a field registered with the engine.
///
/// `FieldId(n)` is the index of the definition in the field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Name used for logging and as the warm-start store key.
    pub name: String,
    /// Lifetime class of the field.
    pub kind: FieldKind,
}

impl FieldDef {
    /// A persistent state field.
    pub fn state(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::State,
        }
    }

    /// An ephemeral per-tick field.
    pub fn derived(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Derived,
        }
    }

    /// Check that the name is usable as a store key.
    ///
    /// Names must be non-empty and consist of ASCII alphanumerics, `_`
    /// or `-`, so they map onto file names without escaping.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("field name must not be empty".to_string());
        }
        if let Some(bad) = self
            .name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(format!(
                "field name '{}' contains invalid character {bad:?}",
                self.name
            ));
        }
        Ok(())
    }
}

/// A set of field IDs packed into a single 64-bit word.
///
/// Used by propagators to declare which fields they read and write, so
/// the engine can validate the pipeline and enforce access at step time.
/// Field IDs must be below [`FieldSet::CAPACITY`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldSet {
    mask: u64,
}

impl FieldSet {
    /// Largest number of distinct fields a set can hold.
    pub const CAPACITY: u32 = 64;

    /// Create an empty field set.
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    fn bit(field: FieldId) -> u64 {
        assert!(
            field.0 < Self::CAPACITY,
            "field id {field} exceeds FieldSet capacity {}",
            Self::CAPACITY
        );
        1u64 << field.0
    }

    /// Insert a field ID into the set.
    ///
    /// # Panics
    ///
    /// Panics if `field.0 >= CAPACITY`.
    pub fn insert(&mut self, field: FieldId) {
        self.mask |= Self::bit(field);
    }

    /// Remove a field ID from the set.
    pub fn remove(&mut self, field: FieldId) {
        if field.0 < Self::CAPACITY {
            self.mask &= !(1u64 << field.0);
        }
    }

    /// Check whether the set contains a field ID.
    pub fn contains(&self, field: FieldId) -> bool {
        field.0 < Self::CAPACITY && self.mask & (1u64 << field.0) != 0
    }

    /// `self | other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            mask: self.mask | other.mask,
        }
    }

    /// `self & other`.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            mask: self.mask & other.mask,
        }
    }

    /// `self - other`.
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            mask: self.mask & !other.mask,
        }
    }

    /// Whether every member of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.mask & !other.mask == 0
    }

    /// Returns `true` if the set contains no fields.
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Number of fields in the set.
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Iterate over the members in ascending order.
    pub fn iter(&self) -> FieldSetIter {
        FieldSetIter { rest: self.mask }
    }
}

impl FromIterator<FieldId> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldId>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl IntoIterator for &FieldSet {
    type Item = FieldId;
    type IntoIter = FieldSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`FieldSet`], lowest ID first.
pub struct FieldSetIter {
    rest: u64,
}

impl Iterator for FieldSetIter {
    type Item = FieldId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest == 0 {
            return None;
        }
        let bit = self.rest.trailing_zeros();
        self.rest &= self.rest - 1;
        Some(FieldId(bit))
    }
}
