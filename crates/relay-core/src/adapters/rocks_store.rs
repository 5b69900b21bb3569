//! RocksDB-backed transaction store.
//!
//! Production durability for the relay's records. Column families keep
//! transactions and wallets apart; the pending insert and the hash
//! reassignment go through a `WriteBatch`, so the record and its derived
//! wallet row commit atomically. A store-level write mutex serializes
//! read-modify-write sequences, which is the serialization the port
//! demands for same-record writers (the relay's write rate is caller
//! traffic, not block traffic; contention is not a concern here).
//!
//! The schema keeps the relational layout's columns inside one encoded
//! value per row; migrations and connection management stay with the
//! platform's ops tooling.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, WriteOptions, DB};

use shared_types::{Address, TxHash};

use crate::domain::{StoreError, TerminalState, TransactionRecord, WalletRecord};
use crate::ports::{TerminalWrite, TransactionStore};

/// Transaction records, keyed by transaction hash.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Wallet records, keyed by owning transaction hash.
pub const CF_WALLETS: &str = "wallets";

const COLUMN_FAMILIES: &[&str] = &[CF_TRANSACTIONS, CF_WALLETS];

/// RocksDB store configuration.
#[derive(Debug, Clone)]
pub struct RocksStoreConfig {
    /// Database directory.
    pub path: PathBuf,
    /// fsync each write. On by default: the pending row must survive a
    /// crash that happens right after broadcast.
    pub sync_writes: bool,
}

impl RocksStoreConfig {
    /// Production defaults at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: true,
        }
    }

    /// Test config: no fsync.
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: false,
        }
    }
}

/// RocksDB-backed [`TransactionStore`].
pub struct RocksRelayStore {
    db: DB,
    write_opts_sync: bool,
    // Serializes read-modify-write sequences (mark_terminal,
    // reassign_hash, set_wallet_address).
    write_guard: Mutex<()>,
}

impl RocksRelayStore {
    /// Open or create the database.
    pub fn open(config: RocksStoreConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| backend(format!("failed to open RocksDB: {e}")))?;

        Ok(Self {
            db,
            write_opts_sync: config.sync_writes,
            write_guard: Mutex::new(()),
        })
    }

    fn write_opts(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.write_opts_sync);
        opts
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| backend(format!("missing column family {name}")))
    }

    fn get_record(&self, hash: &TxHash) -> Result<Option<TransactionRecord>, StoreError> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        self.db
            .get_cf(cf, hash)
            .map_err(|e| backend(e.to_string()))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn get_wallet(&self, hash: &TxHash) -> Result<Option<WalletRecord>, StoreError> {
        let cf = self.cf(CF_WALLETS)?;
        self.db
            .get_cf(cf, hash)
            .map_err(|e| backend(e.to_string()))?
            .map(|bytes| decode(&bytes))
            .transpose()
    }
}

fn backend(message: impl Into<String>) -> StoreError {
    StoreError::Backend {
        message: message.into(),
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization {
        message: e.to_string(),
    })
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization {
        message: e.to_string(),
    })
}

#[async_trait]
impl TransactionStore for RocksRelayStore {
    async fn insert_pending(
        &self,
        record: TransactionRecord,
        wallet: Option<WalletRecord>,
    ) -> Result<(), StoreError> {
        let _guard = self.write_guard.lock();
        if self.get_record(&record.hash)?.is_some() {
            return Err(StoreError::Duplicate { hash: record.hash });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_TRANSACTIONS)?, record.hash, encode(&record)?);
        if let Some(wallet) = wallet {
            batch.put_cf(self.cf(CF_WALLETS)?, wallet.tx_hash, encode(&wallet)?);
        }
        self.db
            .write_opt(batch, &self.write_opts())
            .map_err(|e| backend(e.to_string()))
    }

    async fn reassign_hash(&self, old: &TxHash, new: &TxHash) -> Result<(), StoreError> {
        let _guard = self.write_guard.lock();
        let mut record = self
            .get_record(old)?
            .ok_or(StoreError::NotFound { hash: *old })?;
        record.hash = *new;

        let mut batch = WriteBatch::default();
        batch.delete_cf(self.cf(CF_TRANSACTIONS)?, old);
        batch.put_cf(self.cf(CF_TRANSACTIONS)?, new, encode(&record)?);
        if let Some(mut wallet) = self.get_wallet(old)? {
            wallet.tx_hash = *new;
            batch.delete_cf(self.cf(CF_WALLETS)?, old);
            batch.put_cf(self.cf(CF_WALLETS)?, new, encode(&wallet)?);
        }
        self.db
            .write_opt(batch, &self.write_opts())
            .map_err(|e| backend(e.to_string()))
    }

    async fn get(&self, hash: &TxHash) -> Result<Option<TransactionRecord>, StoreError> {
        self.get_record(hash)
    }

    async fn pending(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let mut pending = Vec::new();
        for entry in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = entry.map_err(|e| backend(e.to_string()))?;
            let record: TransactionRecord = decode(&value)?;
            if !record.state.is_terminal() {
                pending.push(record);
            }
        }
        Ok(pending)
    }

    async fn mark_terminal(
        &self,
        hash: &TxHash,
        state: TerminalState,
        processed_at: u64,
    ) -> Result<TerminalWrite, StoreError> {
        let _guard = self.write_guard.lock();
        let mut record = self
            .get_record(hash)?
            .ok_or(StoreError::NotFound { hash: *hash })?;
        if record.state.is_terminal() {
            return Ok(TerminalWrite::AlreadyTerminal);
        }
        record.state = state.into();
        record.processed_at = Some(processed_at);
        self.db
            .put_cf_opt(
                self.cf(CF_TRANSACTIONS)?,
                hash,
                encode(&record)?,
                &self.write_opts(),
            )
            .map_err(|e| backend(e.to_string()))?;
        Ok(TerminalWrite::Applied)
    }

    async fn wallet_by_tx(&self, tx_hash: &TxHash) -> Result<Option<WalletRecord>, StoreError> {
        self.get_wallet(tx_hash)
    }

    async fn wallet_address_exists(&self, address: &Address) -> Result<bool, StoreError> {
        let cf = self.cf(CF_WALLETS)?;
        for entry in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = entry.map_err(|e| backend(e.to_string()))?;
            let wallet: WalletRecord = decode(&value)?;
            if wallet.address.as_ref() == Some(address) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn set_wallet_address(
        &self,
        tx_hash: &TxHash,
        address: Address,
    ) -> Result<(), StoreError> {
        let _guard = self.write_guard.lock();
        let mut wallet = self
            .get_wallet(tx_hash)?
            .ok_or(StoreError::NotFound { hash: *tx_hash })?;
        wallet.address = Some(address);
        self.db
            .put_cf_opt(
                self.cf(CF_WALLETS)?,
                tx_hash,
                encode(&wallet)?,
                &self.write_opts(),
            )
            .map_err(|e| backend(e.to_string()))
    }
}
