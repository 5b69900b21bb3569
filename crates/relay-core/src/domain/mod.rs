//! Domain layer: pure types and logic with no I/O dependencies.
//!
//! - `entities`: the transaction/wallet records and their lifecycle
//! - `calldata`: fixed-offset decoding of encoded call arguments
//! - `selectors`: the selector → operation-kind classification table
//! - `authorization`: the privileged-account policy
//! - `errors`: the relay's full error taxonomy
//! - `hashing`: Keccak-256

pub mod authorization;
pub mod calldata;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod selectors;

pub use authorization::{address_from_public_key, PrivilegedAccounts};
pub use entities::{
    OperationKind, TerminalState, TransactionRecord, TxState, WalletRecord,
};
pub use errors::{CodecError, LedgerError, RelayError, StoreError};
pub use hashing::keccak256;
pub use selectors::{selector_of, SelectorTable};
