//! # Outbound Ports (Driven Ports)
//!
//! SPIs the relay core requires from its collaborators: the ledger
//! client, the signed-payload codec, the durable transaction store and a
//! clock. Adapters implement these; the service and sweeper only ever
//! see the traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use shared_types::{Address, Hash, TxHash, U256};

use crate::domain::{
    CodecError, LedgerError, StoreError, TerminalState, TransactionRecord, WalletRecord,
};

/// One log entry from a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    /// Contract that emitted the log.
    pub address: Address,
    /// Indexed topics; topic 0 is the event signature digest.
    pub topics: Vec<Hash>,
    /// Unindexed payload bytes.
    pub data: Vec<u8>,
}

/// The ledger's record of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// The transaction this receipt belongs to.
    pub tx_hash: TxHash,
    /// Whether execution succeeded.
    pub status_ok: bool,
    /// Logs emitted during execution.
    pub logs: Vec<ReceiptLog>,
}

/// Fields recovered from a signed payload by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Sender, recovered from the payload signature. This is the only
    /// sender identity the relay trusts.
    pub sender: Address,
    /// Target contract address.
    pub to: Address,
    /// Raw call data, selector included.
    pub input: Vec<u8>,
}

/// Asynchronous client for the ledger network.
///
/// A supplied component: the relay consumes this contract and never sees
/// the JSON-RPC transport behind it. `get_transaction_count` and
/// `get_gas_price` exist for the call-builder collaborators and are
/// carried on the port for them.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Broadcast a signed payload. The returned hash is the ledger's
    /// identity for the transaction.
    async fn send_raw_transaction(&self, signed: &[u8]) -> Result<TxHash, LedgerError>;

    /// Fetch the receipt for a transaction, `None` while unconfirmed.
    async fn get_transaction_receipt(&self, hash: TxHash)
        -> Result<Option<Receipt>, LedgerError>;

    /// Resolve once the receipt for `hash` arrives. At most one terminal
    /// event; the future may pend forever, in which case the sweeper is
    /// the sole source of truth.
    async fn subscribe_receipt(&self, hash: TxHash) -> Result<Receipt, LedgerError>;

    /// Current nonce for an account.
    async fn get_transaction_count(&self, address: Address) -> Result<u64, LedgerError>;

    /// Current gas price.
    async fn get_gas_price(&self) -> Result<U256, LedgerError>;
}

/// Decoder for caller-supplied signed payloads.
///
/// A supplied component: signature verification and envelope decoding
/// are not reimplemented in the relay.
pub trait PayloadCodec: Send + Sync {
    /// Recover sender, target and call data from a signed payload.
    fn decode(&self, signed: &[u8]) -> Result<DecodedPayload, CodecError>;
}

/// Outcome of an idempotent terminal write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalWrite {
    /// The record moved from pending to the terminal state.
    Applied,
    /// The record was already terminal; nothing changed.
    AlreadyTerminal,
}

/// The durable record of every operation ever submitted.
///
/// The store is the only shared mutable resource in the core. It must
/// serialize concurrent writes to the same record while allowing
/// unrestricted concurrency across records; both completers rely on
/// `mark_terminal` being an idempotent upsert, not a strict insert.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Commit a pending record, and atomically with it the derived
    /// wallet record when the operation creates a wallet. Either both
    /// rows land or neither does.
    async fn insert_pending(
        &self,
        record: TransactionRecord,
        wallet: Option<WalletRecord>,
    ) -> Result<(), StoreError>;

    /// Re-key a record (and its wallet record, if any) after the ledger
    /// assigned a different hash than the speculative one.
    async fn reassign_hash(&self, old: &TxHash, new: &TxHash) -> Result<(), StoreError>;

    /// Fetch a record by hash.
    async fn get(&self, hash: &TxHash) -> Result<Option<TransactionRecord>, StoreError>;

    /// All records currently pending.
    async fn pending(&self) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Idempotently promote a record to a terminal state. Re-observing a
    /// terminal record reports `AlreadyTerminal` and is not an error.
    async fn mark_terminal(
        &self,
        hash: &TxHash,
        state: TerminalState,
        processed_at: u64,
    ) -> Result<TerminalWrite, StoreError>;

    /// Fetch the wallet record owned by a creation transaction.
    async fn wallet_by_tx(&self, tx_hash: &TxHash) -> Result<Option<WalletRecord>, StoreError>;

    /// Whether any wallet record has resolved to `address`.
    async fn wallet_address_exists(&self, address: &Address) -> Result<bool, StoreError>;

    /// Cache the resolved address on a wallet record. Last write wins;
    /// the value is derived from immutable on-ledger data, so concurrent
    /// writers always agree.
    async fn set_wallet_address(&self, tx_hash: &TxHash, address: Address)
        -> Result<(), StoreError>;
}

/// Clock abstraction so tests can pin timestamps.
pub trait TimeSource: Send + Sync {
    /// Current epoch seconds.
    fn now(&self) -> u64;
}
