//! # Primitive Entities
//!
//! Fixed-width primitives for everything the relay exchanges with the
//! ledger. Addresses and hashes are byte arrays end to end; the hex
//! representation only exists at the RPC and storage boundaries (see
//! [`crate::encoding`]).

// Re-export U256 from primitive-types for use across the workspace.
pub use primitive_types::U256;

/// A 20-byte ledger account address.
pub type Address = [u8; 20];

/// A 32-byte transaction hash, assigned by the ledger at broadcast time.
pub type TxHash = [u8; 32];

/// A 32-byte hash (receipt log topics, signature digests).
pub type Hash = [u8; 32];

/// The first four bytes of the Keccak-256 digest of a canonical function
/// signature. Identifies the operation a call payload encodes.
pub type Selector = [u8; 4];

/// The zero address. Used as the burn/placeholder target.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Width of one ABI word in bytes. Every encoded argument occupies a
/// multiple of this.
pub const WORD_BYTES: usize = 32;
