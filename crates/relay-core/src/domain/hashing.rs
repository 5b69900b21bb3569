//! Keccak-256, the ledger's standard hash function.
//!
//! Used for selector derivation, speculative transaction hashes, and
//! operator-key address derivation. This is Keccak as the ledger speaks
//! it, not the padded SHA-3 variant.

use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
