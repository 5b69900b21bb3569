//! # Inbound Port (Driving Port)
//!
//! The API the relay core exposes to the RPC-facing boundary. The
//! boundary maps external typed messages onto these calls and the error
//! taxonomy in [`crate::domain::RelayError`]; it adds nothing else.

use async_trait::async_trait;

use shared_types::{Address, TxHash};

use crate::domain::{OperationKind, RelayError, TransactionRecord};

/// Primary API of the relay core.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Relay a pre-signed operation.
    ///
    /// Authorizes the recovered sender, classifies the encoded call,
    /// rejects a mislabeled `declared_kind`, durably records the
    /// operation as pending, broadcasts it, and registers a best-effort
    /// receipt subscription. Returns the pending record; confirmation
    /// arrives asynchronously.
    ///
    /// ## Errors
    ///
    /// `Forbidden`, `UnknownOperation`, `TypeMismatch`,
    /// `MalformedPayload`, `BroadcastFailed`, plus store faults.
    async fn submit(
        &self,
        signed_payload_hex: &str,
        declared_kind: OperationKind,
    ) -> Result<TransactionRecord, RelayError>;

    /// Fetch a record by its ledger transaction hash.
    async fn get_by_hash(&self, hash: &TxHash) -> Result<TransactionRecord, RelayError>;

    /// Resolve the on-ledger address created by a wallet-creation
    /// transaction, caching it on first resolution.
    ///
    /// ## Errors
    ///
    /// `NotFound`, `NotYetMined`, `TransactionFailed`, plus ledger and
    /// store faults.
    async fn resolve_wallet_address(&self, creation_tx_hash: &TxHash)
        -> Result<Address, RelayError>;
}
