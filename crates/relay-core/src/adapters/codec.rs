//! Framed payload codec.
//!
//! Production wiring supplies the platform's payload codec, which
//! recovers the sender by verifying the payload signature. This adapter
//! decodes the fixed dev frame `sender(20) || to(20) || call data` used
//! by dev runs and the test suite; the sender field plays the role of
//! the recovered signer.

use shared_types::Address;

use crate::domain::CodecError;
use crate::ports::{DecodedPayload, PayloadCodec};

/// Byte length of the two address fields at the front of the frame.
const HEADER_BYTES: usize = 40;

/// Codec for the `sender || to || call data` dev frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FramedPayloadCodec;

impl FramedPayloadCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }

    /// Assemble a frame (dev and test helper).
    pub fn encode(sender: &Address, to: &Address, input: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(HEADER_BYTES + input.len());
        frame.extend_from_slice(sender);
        frame.extend_from_slice(to);
        frame.extend_from_slice(input);
        frame
    }
}

impl PayloadCodec for FramedPayloadCodec {
    fn decode(&self, signed: &[u8]) -> Result<DecodedPayload, CodecError> {
        if signed.len() < HEADER_BYTES {
            return Err(CodecError::InvalidEncoding {
                message: format!(
                    "frame too short: {} bytes, header needs {}",
                    signed.len(),
                    HEADER_BYTES
                ),
            });
        }
        let mut sender = [0u8; 20];
        sender.copy_from_slice(&signed[..20]);
        let mut to = [0u8; 20];
        to.copy_from_slice(&signed[20..40]);
        Ok(DecodedPayload {
            sender,
            to,
            input: signed[HEADER_BYTES..].to_vec(),
        })
    }
}
