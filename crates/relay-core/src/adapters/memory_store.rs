//! In-memory transaction store.
//!
//! Backs unit tests and dev runs. A single `RwLock` over both maps makes
//! the pending insert trivially atomic and serializes same-record
//! writes; production durability uses `RocksRelayStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use shared_types::{Address, TxHash};

use crate::domain::{StoreError, TerminalState, TransactionRecord, WalletRecord};
use crate::ports::{TerminalWrite, TransactionStore};

#[derive(Default)]
struct Inner {
    transactions: HashMap<TxHash, TransactionRecord>,
    wallets: HashMap<TxHash, WalletRecord>,
}

/// HashMap-backed [`TransactionStore`].
#[derive(Default)]
pub struct InMemoryRelayStore {
    inner: RwLock<Inner>,
}

impl InMemoryRelayStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of transaction records (test assertions).
    pub fn record_count(&self) -> usize {
        self.inner.read().transactions.len()
    }
}

#[async_trait]
impl TransactionStore for InMemoryRelayStore {
    async fn insert_pending(
        &self,
        record: TransactionRecord,
        wallet: Option<WalletRecord>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.transactions.contains_key(&record.hash) {
            return Err(StoreError::Duplicate { hash: record.hash });
        }
        if let Some(wallet) = wallet {
            inner.wallets.insert(wallet.tx_hash, wallet);
        }
        inner.transactions.insert(record.hash, record);
        Ok(())
    }

    async fn reassign_hash(&self, old: &TxHash, new: &TxHash) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let mut record = inner
            .transactions
            .remove(old)
            .ok_or(StoreError::NotFound { hash: *old })?;
        record.hash = *new;
        inner.transactions.insert(*new, record);

        if let Some(mut wallet) = inner.wallets.remove(old) {
            wallet.tx_hash = *new;
            inner.wallets.insert(*new, wallet);
        }
        Ok(())
    }

    async fn get(&self, hash: &TxHash) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self.inner.read().transactions.get(hash).cloned())
    }

    async fn pending(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .transactions
            .values()
            .filter(|record| !record.state.is_terminal())
            .cloned()
            .collect())
    }

    async fn mark_terminal(
        &self,
        hash: &TxHash,
        state: TerminalState,
        processed_at: u64,
    ) -> Result<TerminalWrite, StoreError> {
        let mut inner = self.inner.write();
        let record = inner
            .transactions
            .get_mut(hash)
            .ok_or(StoreError::NotFound { hash: *hash })?;
        if record.state.is_terminal() {
            return Ok(TerminalWrite::AlreadyTerminal);
        }
        record.state = state.into();
        record.processed_at = Some(processed_at);
        Ok(TerminalWrite::Applied)
    }

    async fn wallet_by_tx(&self, tx_hash: &TxHash) -> Result<Option<WalletRecord>, StoreError> {
        Ok(self.inner.read().wallets.get(tx_hash).cloned())
    }

    async fn wallet_address_exists(&self, address: &Address) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .wallets
            .values()
            .any(|wallet| wallet.address.as_ref() == Some(address)))
    }

    async fn set_wallet_address(
        &self,
        tx_hash: &TxHash,
        address: Address,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let wallet = inner
            .wallets
            .get_mut(tx_hash)
            .ok_or(StoreError::NotFound { hash: *tx_hash })?;
        wallet.address = Some(address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OperationKind, TxState};

    fn record(hash: TxHash) -> TransactionRecord {
        TransactionRecord::pending(
            hash,
            [1u8; 20],
            [2u8; 20],
            vec![0u8; 4],
            OperationKind::Transfer,
            None,
            1_700_000_000,
        )
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemoryRelayStore::new();
        store.insert_pending(record([1u8; 32]), None).await.unwrap();

        let fetched = store.get(&[1u8; 32]).await.unwrap().unwrap();
        assert_eq!(fetched.state, TxState::Pending);
        assert!(store.get(&[2u8; 32]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryRelayStore::new();
        store.insert_pending(record([1u8; 32]), None).await.unwrap();
        assert!(matches!(
            store.insert_pending(record([1u8; 32]), None).await,
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_mark_terminal_is_idempotent() {
        let store = InMemoryRelayStore::new();
        store.insert_pending(record([1u8; 32]), None).await.unwrap();

        let first = store
            .mark_terminal(&[1u8; 32], TerminalState::Mined, 10)
            .await
            .unwrap();
        assert_eq!(first, TerminalWrite::Applied);

        // Second delivery of the same receipt: no error, no change.
        let second = store
            .mark_terminal(&[1u8; 32], TerminalState::Mined, 20)
            .await
            .unwrap();
        assert_eq!(second, TerminalWrite::AlreadyTerminal);

        let fetched = store.get(&[1u8; 32]).await.unwrap().unwrap();
        assert_eq!(fetched.state, TxState::Mined);
        assert_eq!(fetched.processed_at, Some(10));
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_pending_excludes_terminal() {
        let store = InMemoryRelayStore::new();
        store.insert_pending(record([1u8; 32]), None).await.unwrap();
        store.insert_pending(record([2u8; 32]), None).await.unwrap();
        store
            .mark_terminal(&[1u8; 32], TerminalState::Failed, 10)
            .await
            .unwrap();

        let pending = store.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].hash, [2u8; 32]);
    }

    #[tokio::test]
    async fn test_reassign_hash_moves_wallet_too() {
        let store = InMemoryRelayStore::new();
        store
            .insert_pending(record([1u8; 32]), Some(WalletRecord::unresolved([1u8; 32])))
            .await
            .unwrap();

        store.reassign_hash(&[1u8; 32], &[9u8; 32]).await.unwrap();

        assert!(store.get(&[1u8; 32]).await.unwrap().is_none());
        assert_eq!(store.get(&[9u8; 32]).await.unwrap().unwrap().hash, [9u8; 32]);
        let wallet = store.wallet_by_tx(&[9u8; 32]).await.unwrap().unwrap();
        assert_eq!(wallet.tx_hash, [9u8; 32]);
        assert!(store.wallet_by_tx(&[1u8; 32]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wallet_address_lookup() {
        let store = InMemoryRelayStore::new();
        store
            .insert_pending(record([1u8; 32]), Some(WalletRecord::unresolved([1u8; 32])))
            .await
            .unwrap();

        assert!(!store.wallet_address_exists(&[7u8; 20]).await.unwrap());
        store.set_wallet_address(&[1u8; 32], [7u8; 20]).await.unwrap();
        assert!(store.wallet_address_exists(&[7u8; 20]).await.unwrap());
    }
}
