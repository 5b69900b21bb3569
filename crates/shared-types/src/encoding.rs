//! # Hex Boundary Encoding
//!
//! Translation between the byte-array primitives in [`crate::entities`]
//! and the lower-case, `0x`-prefixed hex strings the ledger's RPC surface
//! and the relational schema use.
//!
//! Parsing is tolerant of a missing `0x` prefix and of mixed case;
//! formatting is always prefixed and lower-case so persisted identities
//! compare bytewise.

use thiserror::Error;

use crate::entities::{Address, TxHash};

/// Errors produced when parsing hex input from callers or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    /// Input contained a non-hex character or an odd number of digits.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Input decoded cleanly but had the wrong byte width.
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// Strip an optional `0x`/`0X` prefix.
fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Decode a hex string (prefix optional, case-insensitive) into bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, HexError> {
    hex::decode(strip_prefix(s)).map_err(|e| HexError::InvalidHex(e.to_string()))
}

/// Format bytes as a `0x`-prefixed lower-case hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a 20-byte address.
pub fn parse_address(s: &str) -> Result<Address, HexError> {
    parse_fixed(s)
}

/// Parse a 32-byte transaction hash.
pub fn parse_tx_hash(s: &str) -> Result<TxHash, HexError> {
    parse_fixed(s)
}

/// Parse a 64-byte uncompressed public key point (no `04` tag byte).
pub fn parse_public_key(s: &str) -> Result<[u8; 64], HexError> {
    parse_fixed(s)
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    let bytes = decode_hex(s)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HexError::WrongLength { expected: N, actual })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_accepts_prefix_and_case() {
        assert_eq!(decode_hex("0xAbCd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("abcd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn test_decode_hex_rejects_garbage() {
        assert!(matches!(decode_hex("0xzz"), Err(HexError::InvalidHex(_))));
        assert!(matches!(decode_hex("abc"), Err(HexError::InvalidHex(_))));
    }

    #[test]
    fn test_to_hex_is_lowercase_prefixed() {
        assert_eq!(to_hex(&[0xAB, 0x01]), "0xab01");
    }

    #[test]
    fn test_parse_address_round_trip() {
        let addr = "0x00112233445566778899aabbccddeeff00112233";
        let parsed = parse_address(addr).unwrap();
        assert_eq!(to_hex(&parsed), addr);
    }

    #[test]
    fn test_parse_address_wrong_length() {
        assert_eq!(
            parse_address("0xab01"),
            Err(HexError::WrongLength { expected: 20, actual: 2 })
        );
    }

    #[test]
    fn test_parse_tx_hash() {
        let h = format!("0x{}", "11".repeat(32));
        assert_eq!(parse_tx_hash(&h).unwrap(), [0x11u8; 32]);
    }
}
