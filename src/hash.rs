//! Change-detection hashing for the persisted state fields.
//!
//! Uses FNV-1a for fast, const-compatible hashing. Hosts with their own
//! hash accumulator should fold the raw strings from
//! [`HierarchyStateStore::hash_contribution`](crate::HierarchyStateStore::hash_contribution)
//! instead; the fingerprint is for hosts that only keep a number.

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hash, usable in const context.
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    fnv1a_64_continue(FNV_OFFSET, bytes)
}

/// Continue an FNV-1a hash from a previous state.
pub const fn fnv1a_64_continue(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Fingerprint of both state fields.
///
/// Each field is framed by its length, so moving a bit from one field to
/// the other changes the result.
pub const fn state_fingerprint(node_states: &str, item_states: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_64_continue(hash, &(node_states.len() as u64).to_le_bytes());
    hash = fnv1a_64_continue(hash, node_states.as_bytes());
    hash = fnv1a_64_continue(hash, &(item_states.len() as u64).to_le_bytes());
    fnv1a_64_continue(hash, item_states.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_basic_sanity() {
        assert_ne!(fnv1a_64(b"hello"), fnv1a_64(b"world"));
        assert_eq!(fnv1a_64(b"hello"), fnv1a_64(b"hello"));
        assert_eq!(fnv1a_64(b""), FNV_OFFSET);
    }

    #[test]
    fn continue_equals_concatenation() {
        let split = fnv1a_64_continue(fnv1a_64(b"10"), b"01");
        assert_eq!(split, fnv1a_64(b"1001"));
    }

    #[test]
    fn fingerprint_separates_fields() {
        assert_ne!(state_fingerprint("1", ""), state_fingerprint("", "1"));
        assert_ne!(state_fingerprint("10", "1"), state_fingerprint("1", "01"));
        assert_eq!(state_fingerprint("110", "01"), state_fingerprint("110", "01"));
    }

    #[test]
    fn fingerprint_tracks_single_bit() {
        assert_ne!(state_fingerprint("110", "01"), state_fingerprint("100", "01"));
        assert_ne!(state_fingerprint("110", "01"), state_fingerprint("110", "00"));
    }
}
