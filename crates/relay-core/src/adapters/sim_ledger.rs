//! Simulated ledger client.
//!
//! In production the node wires the platform's JSON-RPC ledger client
//! behind the [`LedgerClient`] port. This adapter stands in for it in
//! dev runs and the test suite: receipts are scripted, broadcasts are
//! recorded, and every failure mode the pipeline must survive can be
//! injected deterministically.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;

use shared_types::{Address, TxHash, U256};

use crate::domain::{keccak256, LedgerError};
use crate::ports::{LedgerClient, Receipt, ReceiptLog};

#[derive(Default)]
struct Inner {
    receipts: HashMap<TxHash, Receipt>,
    broadcasts: Vec<TxHash>,
    broadcast_hash_override: Option<TxHash>,
    fail_broadcasts: bool,
    fail_receipt_queries_for: HashSet<TxHash>,
    unreachable: bool,
    nonces: HashMap<Address, u64>,
    gas_price: U256,
}

/// Scriptable in-process [`LedgerClient`].
pub struct SimulatedLedger {
    inner: RwLock<Inner>,
    receipt_arrived: Notify,
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedLedger {
    /// A reachable ledger with no receipts yet.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                gas_price: U256::from(1_000_000_000u64),
                ..Inner::default()
            }),
            receipt_arrived: Notify::new(),
        }
    }

    /// Script the receipt for a transaction; wakes any subscriber.
    pub fn deliver_receipt(&self, tx_hash: TxHash, status_ok: bool, logs: Vec<ReceiptLog>) {
        self.inner.write().receipts.insert(
            tx_hash,
            Receipt {
                tx_hash,
                status_ok,
                logs,
            },
        );
        self.receipt_arrived.notify_waiters();
    }

    /// Force `send_raw_transaction` to return this hash instead of the
    /// payload digest.
    pub fn override_broadcast_hash(&self, hash: TxHash) {
        self.inner.write().broadcast_hash_override = Some(hash);
    }

    /// Make every broadcast fail at the transport level.
    pub fn fail_broadcasts(&self, fail: bool) {
        self.inner.write().fail_broadcasts = fail;
    }

    /// Make receipt queries for one transaction fail.
    pub fn fail_receipt_queries_for(&self, tx_hash: TxHash) {
        self.inner.write().fail_receipt_queries_for.insert(tx_hash);
    }

    /// Drop or restore connectivity entirely.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.write().unreachable = unreachable;
    }

    /// Hashes broadcast so far, in order.
    pub fn broadcasts(&self) -> Vec<TxHash> {
        self.inner.read().broadcasts.clone()
    }

    fn transport_error(message: &str) -> LedgerError {
        LedgerError::Transport {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LedgerClient for SimulatedLedger {
    async fn send_raw_transaction(&self, signed: &[u8]) -> Result<TxHash, LedgerError> {
        let mut inner = self.inner.write();
        if inner.unreachable || inner.fail_broadcasts {
            return Err(Self::transport_error("broadcast refused"));
        }
        let hash = inner
            .broadcast_hash_override
            .unwrap_or_else(|| keccak256(signed));
        inner.broadcasts.push(hash);
        Ok(hash)
    }

    async fn get_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<Receipt>, LedgerError> {
        let inner = self.inner.read();
        if inner.unreachable {
            return Err(Self::transport_error("ledger unreachable"));
        }
        if inner.fail_receipt_queries_for.contains(&hash) {
            return Err(Self::transport_error("receipt query failed"));
        }
        Ok(inner.receipts.get(&hash).cloned())
    }

    async fn subscribe_receipt(&self, hash: TxHash) -> Result<Receipt, LedgerError> {
        loop {
            let notified = self.receipt_arrived.notified();
            {
                let inner = self.inner.read();
                if inner.unreachable {
                    return Err(Self::transport_error("ledger unreachable"));
                }
                if let Some(receipt) = inner.receipts.get(&hash) {
                    return Ok(receipt.clone());
                }
            }
            notified.await;
        }
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, LedgerError> {
        let inner = self.inner.read();
        if inner.unreachable {
            return Err(Self::transport_error("ledger unreachable"));
        }
        Ok(inner.nonces.get(&address).copied().unwrap_or(0))
    }

    async fn get_gas_price(&self) -> Result<U256, LedgerError> {
        let inner = self.inner.read();
        if inner.unreachable {
            return Err(Self::transport_error("ledger unreachable"));
        }
        Ok(inner.gas_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_hash_is_payload_digest() {
        let ledger = SimulatedLedger::new();
        let hash = ledger.send_raw_transaction(b"signed").await.unwrap();
        assert_eq!(hash, keccak256(b"signed"));
        assert_eq!(ledger.broadcasts(), vec![hash]);
    }

    #[tokio::test]
    async fn test_receipt_lifecycle() {
        let ledger = SimulatedLedger::new();
        let hash = [3u8; 32];
        assert!(ledger.get_transaction_receipt(hash).await.unwrap().is_none());

        ledger.deliver_receipt(hash, true, Vec::new());
        let receipt = ledger.get_transaction_receipt(hash).await.unwrap().unwrap();
        assert!(receipt.status_ok);
    }

    #[tokio::test]
    async fn test_subscription_wakes_on_delivery() {
        let ledger = std::sync::Arc::new(SimulatedLedger::new());
        let hash = [4u8; 32];

        let waiter = {
            let ledger = std::sync::Arc::clone(&ledger);
            tokio::spawn(async move { ledger.subscribe_receipt(hash).await })
        };
        tokio::task::yield_now().await;

        ledger.deliver_receipt(hash, false, Vec::new());
        let receipt = waiter.await.unwrap().unwrap();
        assert!(!receipt.status_ok);
    }

    #[tokio::test]
    async fn test_unreachable_ledger_errors() {
        let ledger = SimulatedLedger::new();
        ledger.set_unreachable(true);
        assert!(ledger.send_raw_transaction(b"x").await.is_err());
        assert!(ledger.get_transaction_receipt([0u8; 32]).await.is_err());
        assert!(ledger.get_gas_price().await.is_err());
    }
}
