//! # Relay Service
//!
//! The submission pipeline and the query/resolution surface behind
//! [`RelayApi`]. Collaborators are constructor-injected trait objects;
//! there is no ambient state.
//!
//! ## Submission flow
//!
//! ```text
//! caller ──submit──→ codec.decode ──→ authorize ──→ classify/decode args
//!                                                        │
//!                                                        ↓
//!                 ledger.send_raw_transaction ←── store.insert_pending
//!                        │                                (PENDING)
//!                        ├──→ store.reassign_hash (if ledger hash differs)
//!                        └──→ spawn receipt watcher (best effort)
//! ```
//!
//! The pending row is durably committed before the broadcast call is
//! made. If broadcast then fails, the row stays behind: losing track of
//! a transaction the ledger may have seen is worse than a spurious
//! pending row.

pub mod sweeper;

pub use sweeper::{ReconciliationSweeper, SweepReport};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use shared_types::{decode_hex, to_hex, Address, Selector, TxHash};

use crate::domain::{
    calldata, keccak256, OperationKind, PrivilegedAccounts, RelayError, SelectorTable,
    TerminalState, TransactionRecord, TxState, WalletRecord,
};
use crate::ports::{
    LedgerClient, PayloadCodec, Receipt, RelayApi, TerminalWrite, TimeSource, TransactionStore,
};

/// Selector width at the front of the call data.
const SELECTOR_BYTES: usize = 4;

/// Orchestrates authorization, classification, persistence, broadcast
/// and the best-effort fast confirmation path.
pub struct RelayService {
    store: Arc<dyn TransactionStore>,
    ledger: Arc<dyn LedgerClient>,
    codec: Arc<dyn PayloadCodec>,
    clock: Arc<dyn TimeSource>,
    selectors: SelectorTable,
    privileged: PrivilegedAccounts,
}

impl RelayService {
    /// Wire the pipeline from its collaborators.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        ledger: Arc<dyn LedgerClient>,
        codec: Arc<dyn PayloadCodec>,
        clock: Arc<dyn TimeSource>,
        selectors: SelectorTable,
        privileged: PrivilegedAccounts,
    ) -> Self {
        Self {
            store,
            ledger,
            codec,
            clock,
            selectors,
            privileged,
        }
    }

    /// Privileged accounts pass outright; everyone else must own a
    /// registered wallet resolved to the sender address.
    async fn authorize(&self, sender: &Address) -> Result<(), RelayError> {
        if self.privileged.is_privileged(sender) {
            return Ok(());
        }
        if self.store.wallet_address_exists(sender).await? {
            return Ok(());
        }
        Err(RelayError::Forbidden { sender: *sender })
    }

    /// Split call data into selector and argument bytes.
    fn split_call_data(input: &[u8]) -> Result<(Selector, &[u8]), RelayError> {
        if input.len() < SELECTOR_BYTES {
            return Err(RelayError::MalformedPayload {
                reason: format!("call data too short for a selector: {} bytes", input.len()),
            });
        }
        let (head, args) = input.split_at(SELECTOR_BYTES);
        let mut selector = [0u8; 4];
        selector.copy_from_slice(head);
        Ok((selector, args))
    }

    /// Fire-and-forget fast confirmation path. Racing the sweeper is
    /// expected and safe: the terminal write is an idempotent upsert.
    fn spawn_receipt_watcher(&self, hash: TxHash) {
        let ledger = Arc::clone(&self.ledger);
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);

        tokio::spawn(async move {
            match ledger.subscribe_receipt(hash).await {
                Ok(receipt) => {
                    let state = TerminalState::from_status(receipt.status_ok);
                    match store.mark_terminal(&hash, state, clock.now()).await {
                        Ok(TerminalWrite::Applied) => {
                            info!(tx_hash = %to_hex(&hash), state = %TxState::from(state), "receipt subscription confirmed transaction");
                        }
                        Ok(TerminalWrite::AlreadyTerminal) => {
                            debug!(tx_hash = %to_hex(&hash), "subscription receipt arrived after sweeper; no-op");
                        }
                        Err(error) => {
                            warn!(tx_hash = %to_hex(&hash), %error, "failed to persist subscription receipt; sweeper will retry");
                        }
                    }
                }
                Err(error) => {
                    debug!(tx_hash = %to_hex(&hash), %error, "receipt subscription ended without a receipt; sweeper remains authoritative");
                }
            }
        });
    }

    /// Pull the created wallet's address out of a creation receipt: the
    /// second topic of the first wallet log, decoded as an address word.
    fn wallet_address_from_receipt(receipt: &Receipt) -> Result<Address, RelayError> {
        let topic = receipt
            .logs
            .iter()
            .find_map(|log| log.topics.get(1))
            .ok_or_else(|| RelayError::MalformedPayload {
                reason: "wallet creation receipt carries no address topic".into(),
            })?;
        calldata::decode_address(topic, 0)
    }
}

#[async_trait]
impl RelayApi for RelayService {
    async fn submit(
        &self,
        signed_payload_hex: &str,
        declared_kind: OperationKind,
    ) -> Result<TransactionRecord, RelayError> {
        let signed = decode_hex(signed_payload_hex)?;
        let payload = self.codec.decode(&signed)?;

        self.authorize(&payload.sender).await?;

        let (selector, args) = Self::split_call_data(&payload.input)?;
        let kind = self.selectors.classify(selector)?;
        if kind != declared_kind {
            return Err(RelayError::TypeMismatch {
                declared: declared_kind,
                decoded: kind,
            });
        }

        let amount = if kind.carries_amount() {
            let (_target, amount) = calldata::decode_address_and_amount(args)?;
            Some(amount)
        } else {
            if kind == OperationKind::WalletCreation {
                // Argument well-formedness gate; the owner address itself
                // is not persisted on the record.
                calldata::decode_address(args, 0)?;
            }
            None
        };

        // Identity is assigned by the ledger. Until broadcast returns we
        // key the row under the payload digest, which matches the
        // ledger's assignment for standard encodings.
        let speculative_hash = keccak256(&signed);
        let now = self.clock.now();
        let mut record = TransactionRecord::pending(
            speculative_hash,
            payload.sender,
            payload.to,
            payload.input.clone(),
            kind,
            amount,
            now,
        );
        let wallet = (kind == OperationKind::WalletCreation)
            .then(|| WalletRecord::unresolved(speculative_hash));

        // The pending row must be durably committed before broadcast.
        self.store.insert_pending(record.clone(), wallet).await?;

        let hash = match self.ledger.send_raw_transaction(&signed).await {
            Ok(hash) => hash,
            Err(source) => {
                warn!(
                    tx_hash = %to_hex(&speculative_hash),
                    error = %source,
                    "broadcast failed; pending row left for operators"
                );
                return Err(RelayError::BroadcastFailed { source });
            }
        };

        if hash != speculative_hash {
            self.store.reassign_hash(&speculative_hash, &hash).await?;
            record.hash = hash;
        }

        info!(
            tx_hash = %to_hex(&hash),
            kind = %kind,
            sender = %to_hex(&record.from),
            "operation broadcast; awaiting receipt"
        );

        self.spawn_receipt_watcher(hash);
        Ok(record)
    }

    async fn get_by_hash(&self, hash: &TxHash) -> Result<TransactionRecord, RelayError> {
        self.store
            .get(hash)
            .await?
            .ok_or(RelayError::NotFound { hash: *hash })
    }

    async fn resolve_wallet_address(
        &self,
        creation_tx_hash: &TxHash,
    ) -> Result<Address, RelayError> {
        let wallet = self
            .store
            .wallet_by_tx(creation_tx_hash)
            .await?
            .ok_or(RelayError::NotFound {
                hash: *creation_tx_hash,
            })?;

        // Cached address: derived from immutable on-ledger data, so once
        // set it never needs refreshing, even if the ledger goes away.
        if let Some(address) = wallet.address {
            return Ok(address);
        }

        let record = self
            .store
            .get(creation_tx_hash)
            .await?
            .ok_or(RelayError::NotFound {
                hash: *creation_tx_hash,
            })?;

        match record.state {
            TxState::Pending => Err(RelayError::NotYetMined {
                hash: *creation_tx_hash,
            }),
            TxState::Failed => Err(RelayError::TransactionFailed {
                hash: *creation_tx_hash,
            }),
            TxState::Mined => {
                let receipt = self
                    .ledger
                    .get_transaction_receipt(*creation_tx_hash)
                    .await?
                    .ok_or_else(|| {
                        RelayError::Ledger(crate::domain::LedgerError::Transport {
                            message: "receipt unavailable for mined transaction".into(),
                        })
                    })?;

                let address = Self::wallet_address_from_receipt(&receipt)?;
                self.store
                    .set_wallet_address(creation_tx_hash, address)
                    .await?;

                info!(
                    tx_hash = %to_hex(creation_tx_hash),
                    wallet = %to_hex(&address),
                    "wallet address resolved and cached"
                );
                Ok(address)
            }
        }
    }
}
