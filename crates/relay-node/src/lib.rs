//! # Relay Node Runtime
//!
//! Wires the relay pipeline from its adapters and owns the process
//! lifecycle: build the store, construct the service, start the
//! reconciliation sweeper, and stop everything deterministically on
//! shutdown.
//!
//! ## Startup sequence
//!
//! 1. Load and validate configuration from the environment
//! 2. Open the transaction store (RocksDB when a path is configured)
//! 3. Construct the pipeline with its injected collaborators
//! 4. Spawn the sweeper loop
//! 5. Hand the inbound [`RelayApi`] surface to the RPC boundary
//!
//! The ledger client wired here is the simulated adapter; production
//! deployments substitute the platform's JSON-RPC client behind the same
//! [`relay_core::LedgerClient`] port.

pub mod config;

pub use config::NodeConfig;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use relay_core::adapters::{FramedPayloadCodec, InMemoryRelayStore, SimulatedLedger, SystemClock};
use relay_core::{
    LedgerClient, PrivilegedAccounts, ReconciliationSweeper, RelayApi, RelayService,
    SelectorTable, TransactionStore,
};

/// The running relay daemon.
pub struct RelayNode {
    api: Arc<dyn RelayApi>,
    sweeper: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl RelayNode {
    /// Build every component and start the sweeper.
    pub fn start(config: NodeConfig) -> Result<Self> {
        config.validate()?;
        info!("starting relay node");
        info!(
            operator = %shared_types::to_hex(&config.operator_address),
            sweep_interval_secs = config.sweeper.interval_secs,
            "configuration loaded"
        );

        let store = open_store(&config)?;
        let ledger: Arc<dyn LedgerClient> = Arc::new(SimulatedLedger::new());
        let clock = Arc::new(SystemClock);

        let service = RelayService::new(
            Arc::clone(&store),
            Arc::clone(&ledger),
            Arc::new(FramedPayloadCodec::new()),
            clock.clone(),
            SelectorTable::standard(),
            PrivilegedAccounts::new(config.operator_address, &config.operator_public_key),
        );

        let (shutdown, shutdown_rx) = watch::channel(false);
        let sweeper = Arc::new(ReconciliationSweeper::new(
            store,
            ledger,
            clock,
            config.sweeper.clone(),
        ))
        .spawn(shutdown_rx);

        Ok(Self {
            api: Arc::new(service),
            sweeper,
            shutdown,
        })
    }

    /// The inbound surface consumed by the RPC boundary.
    pub fn api(&self) -> Arc<dyn RelayApi> {
        Arc::clone(&self.api)
    }

    /// Stop the sweeper and wait for it to drain.
    pub async fn shutdown(self) {
        if self.shutdown.send(true).is_err() {
            warn!("sweeper already stopped");
        }
        if let Err(join_error) = self.sweeper.await {
            error!(%join_error, "sweeper task did not shut down cleanly");
        }
        info!("relay node stopped");
    }
}

fn open_store(config: &NodeConfig) -> Result<Arc<dyn TransactionStore>> {
    #[cfg(feature = "rocksdb")]
    if let Some(path) = &config.db_path {
        use relay_core::adapters::{RocksRelayStore, RocksStoreConfig};
        info!(path = %path.display(), "opening RocksDB transaction store");
        let store = RocksRelayStore::open(RocksStoreConfig::at(path))?;
        return Ok(Arc::new(store));
    }

    warn!("no database path configured; records will not survive a restart");
    Ok(Arc::new(InMemoryRelayStore::new()))
}
