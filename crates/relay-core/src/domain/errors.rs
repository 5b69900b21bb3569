//! # Domain Errors
//!
//! The full error taxonomy of the relay core. Every failure path in the
//! pipeline, the sweeper and the query surface produces one of the named
//! conditions below; nothing is swallowed.
//!
//! Permanent conditions (`Forbidden`, `UnknownOperation`, `TypeMismatch`,
//! `MalformedPayload`) surface to the caller and are never retried.
//! `BroadcastFailed` is surfaced without local retry: the caller owns the
//! retry with a fresh payload, since nonce and gas price may have moved.
//! Sweeper-side query failures never become process failures; the next
//! tick retries them implicitly.

use thiserror::Error;

use shared_types::{to_hex, Address, Selector, TxHash};

use super::entities::OperationKind;

/// Infrastructure faults from the transaction store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Underlying storage engine fault.
    #[error("storage backend error: {message}")]
    Backend { message: String },

    /// A persisted value failed to round-trip through the codec.
    #[error("storage serialization error: {message}")]
    Serialization { message: String },

    /// No record under the given hash.
    #[error("no record for transaction {}", to_hex(.hash))]
    NotFound { hash: TxHash },

    /// A pending insert collided with an existing record.
    #[error("record for transaction {} already exists", to_hex(.hash))]
    Duplicate { hash: TxHash },
}

/// Faults talking to the ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Transport-level failure: connection, timeout, malformed response.
    #[error("ledger transport error: {message}")]
    Transport { message: String },

    /// The ledger accepted the connection but rejected the request.
    #[error("ledger rejected request: {message}")]
    Rejected { message: String },
}

/// Faults from the supplied payload codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The payload is not a well-formed signed envelope.
    #[error("invalid payload encoding: {message}")]
    InvalidEncoding { message: String },

    /// Signature recovery failed, so no sender can be trusted.
    #[error("signature recovery failed: {message}")]
    SignatureRecovery { message: String },
}

/// Everything the relay's inbound surface can report.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Sender is neither privileged nor a registered wallet owner.
    #[error("sender {} is not authorized to broadcast", to_hex(.sender))]
    Forbidden { sender: Address },

    /// The selector matches no registered signature.
    #[error("unknown operation selector {}", to_hex(.selector))]
    UnknownOperation { selector: Selector },

    /// The caller's declared kind does not match the encoded call.
    #[error("declared kind {declared} does not match encoded {decoded}")]
    TypeMismatch {
        declared: OperationKind,
        decoded: OperationKind,
    },

    /// The payload or its arguments cannot be decoded.
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// The ledger client failed while broadcasting. The pending record
    /// has already been committed and is left in place; the caller owns
    /// the retry with a fresh payload.
    #[error("broadcast failed: {source}")]
    BroadcastFailed { source: LedgerError },

    /// No record under the given hash.
    #[error("no record for transaction {}", to_hex(.hash))]
    NotFound { hash: TxHash },

    /// Wallet address asked for before the creation transaction mined.
    #[error("transaction {} is not yet mined", to_hex(.hash))]
    NotYetMined { hash: TxHash },

    /// Wallet address asked for on a failed creation transaction.
    #[error("transaction {} failed on the ledger", to_hex(.hash))]
    TransactionFailed { hash: TxHash },

    /// Store fault outside the named conditions.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Ledger fault outside the broadcast path (receipt queries).
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<CodecError> for RelayError {
    fn from(err: CodecError) -> Self {
        RelayError::MalformedPayload {
            reason: err.to_string(),
        }
    }
}

impl From<shared_types::HexError> for RelayError {
    fn from(err: shared_types::HexError) -> Self {
        RelayError::MalformedPayload {
            reason: err.to_string(),
        }
    }
}
