//! Fingerprints of persisted state.
//!
//! FNV-1a over the bit patterns of every cell, so two snapshots hash
//! equal exactly when their stored values are bit-identical. Not
//! cryptographically secure; used to log and compare final states.

use lynx_core::{FieldId, SnapshotAccess};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for b in v.to_le_bytes() {
        hash = (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hash the listed fields of a snapshot, in the order given.
///
/// The field ID is folded in before each field's data so that swapping
/// two fields changes the hash. Absent fields contribute only their ID.
pub fn snapshot_hash(snapshot: &dyn SnapshotAccess, fields: &[FieldId]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &field in fields {
        hash = fnv1a_u64(hash, u64::from(field.0));
        if let Some(data) = snapshot.read_field(field) {
            for &v in data {
                hash = fnv1a_u64(hash, v.to_bits());
            }
        }
    }
    hash
}
