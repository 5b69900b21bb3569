//! # Authorization Policy
//!
//! Who may broadcast through the relay: the two platform-privileged
//! accounts always pass; anyone else must own a registered wallet whose
//! resolved address matches the sender. The wallet lookup lives in the
//! service (it needs the store); this module owns the privileged set and
//! the operator-key address derivation.
//!
//! The check always runs against the sender recovered from the signed
//! payload by the codec. A caller-asserted sender is never trusted:
//! that would allow impersonating a registered wallet owner.

use shared_types::Address;

use super::hashing::keccak256;

/// Derive the ledger address of an uncompressed 64-byte public key
/// point: the low 20 bytes of its Keccak-256 digest.
pub fn address_from_public_key(public_key: &[u8; 64]) -> Address {
    let digest = keccak256(public_key);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

/// The configured platform-privileged accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegedAccounts {
    platform_operator: Address,
    operator_key_address: Address,
}

impl PrivilegedAccounts {
    /// Build from the platform-operator address and the operator key,
    /// deriving the second privileged address from the key.
    pub fn new(platform_operator: Address, operator_public_key: &[u8; 64]) -> Self {
        Self {
            platform_operator,
            operator_key_address: address_from_public_key(operator_public_key),
        }
    }

    /// Build from two already-known addresses.
    pub fn from_addresses(platform_operator: Address, operator_key_address: Address) -> Self {
        Self {
            platform_operator,
            operator_key_address,
        }
    }

    /// Whether `sender` is one of the privileged accounts.
    pub fn is_privileged(&self, sender: &Address) -> bool {
        *sender == self.platform_operator || *sender == self.operator_key_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_address_is_low_20_bytes_of_digest() {
        let key = [7u8; 64];
        let digest = keccak256(&key);
        let address = address_from_public_key(&key);
        assert_eq!(address.as_slice(), &digest[12..32]);
    }

    #[test]
    fn test_both_privileged_accounts_pass() {
        let operator = [1u8; 20];
        let key = [9u8; 64];
        let accounts = PrivilegedAccounts::new(operator, &key);

        assert!(accounts.is_privileged(&operator));
        assert!(accounts.is_privileged(&address_from_public_key(&key)));
        assert!(!accounts.is_privileged(&[0xee; 20]));
    }
}
