//! # Call-Data Field Decoder
//!
//! Fixed-offset decoding of the two argument shapes the relay
//! classifies: a lone address, and an `(address, uint256)` pair. Each
//! argument occupies one left-zero-padded 32-byte word.
//!
//! Pure functions, total over well-formed input; a short blob is a
//! [`RelayError::MalformedPayload`]. Amounts decode into [`U256`], so the
//! full unsigned 256-bit range survives without precision loss.
//!
//! Deliberately not a general ABI codec: dynamic types, tuples and
//! offsets are out of scope. The two shapes here are the only ones the
//! classifier needs, decoded explicitly instead of through any codec
//! library's internals.

use shared_types::{Address, U256, WORD_BYTES};

use super::errors::RelayError;

/// Number of leading zero bytes in an address word.
const ADDRESS_PAD: usize = WORD_BYTES - 20;

/// Borrow the 32-byte word at `word_offset`.
fn word_at(data: &[u8], word_offset: usize) -> Result<&[u8], RelayError> {
    let start = word_offset * WORD_BYTES;
    let end = start + WORD_BYTES;
    data.get(start..end).ok_or_else(|| RelayError::MalformedPayload {
        reason: format!(
            "argument blob too short: need {} bytes, have {}",
            end,
            data.len()
        ),
    })
}

/// Decode the address stored in the word at `word_offset`.
pub fn decode_address(data: &[u8], word_offset: usize) -> Result<Address, RelayError> {
    let word = word_at(data, word_offset)?;
    let mut address = [0u8; 20];
    address.copy_from_slice(&word[ADDRESS_PAD..]);
    Ok(address)
}

/// Decode the unsigned 256-bit integer stored in the word at
/// `word_offset`.
pub fn decode_amount(data: &[u8], word_offset: usize) -> Result<U256, RelayError> {
    Ok(U256::from_big_endian(word_at(data, word_offset)?))
}

/// Decode an `(address, uint256)` argument pair: two consecutive words,
/// address first.
pub fn decode_address_and_amount(data: &[u8]) -> Result<(Address, U256), RelayError> {
    let address = decode_address(data, 0)?;
    let amount = decode_amount(data, 1)?;
    Ok((address, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_word(address: Address) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[ADDRESS_PAD..].copy_from_slice(&address);
        word
    }

    fn amount_word(amount: U256) -> [u8; 32] {
        let mut word = [0u8; 32];
        amount.to_big_endian(&mut word);
        word
    }

    #[test]
    fn test_address_round_trip() {
        for address in [[0u8; 20], [0xff; 20], [0x5a; 20]] {
            let word = address_word(address);
            assert_eq!(decode_address(&word, 0).unwrap(), address);
        }
    }

    #[test]
    fn test_address_at_later_word() {
        let mut blob = Vec::new();
        blob.extend_from_slice(&[0u8; 32]);
        blob.extend_from_slice(&address_word([0x42; 20]));
        assert_eq!(decode_address(&blob, 1).unwrap(), [0x42; 20]);
    }

    #[test]
    fn test_amount_decoding_is_exact() {
        for amount in [U256::zero(), U256::one(), U256::MAX] {
            let word = amount_word(amount);
            assert_eq!(decode_amount(&word, 0).unwrap(), amount);
        }
    }

    #[test]
    fn test_address_and_amount_pair() {
        let address = [0x11; 20];
        let amount = U256::from(123_456_789u64);
        let mut blob = Vec::new();
        blob.extend_from_slice(&address_word(address));
        blob.extend_from_slice(&amount_word(amount));

        let (decoded_address, decoded_amount) = decode_address_and_amount(&blob).unwrap();
        assert_eq!(decoded_address, address);
        assert_eq!(decoded_amount, amount);
    }

    #[test]
    fn test_short_blob_is_malformed() {
        let blob = [0u8; 31];
        assert!(matches!(
            decode_address(&blob, 0),
            Err(RelayError::MalformedPayload { .. })
        ));

        // One word present, pair needs two.
        let blob = [0u8; 32];
        assert!(matches!(
            decode_address_and_amount(&blob),
            Err(RelayError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_empty_blob_is_malformed() {
        assert!(matches!(
            decode_address(&[], 0),
            Err(RelayError::MalformedPayload { .. })
        ));
    }
}
