//! # Node Configuration
//!
//! Environment-driven configuration for the relay daemon.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RELAY_OPERATOR_ADDRESS` | (required) | Platform-operator address |
//! | `RELAY_OPERATOR_PUBKEY` | (required) | 64-byte operator public key |
//! | `RELAY_SWEEP_INTERVAL_SECS` | `5` | Seconds between sweep ticks |
//! | `RELAY_SWEEP_MAX_CONCURRENT` | `8` | Receipt queries in flight per tick |
//! | `RELAY_DB_PATH` | unset | RocksDB directory; in-memory if unset |

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use relay_core::SweeperConfig;
use shared_types::{parse_address, parse_public_key, Address, ZERO_ADDRESS};

/// Complete daemon configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Platform-operator address (always authorized to broadcast).
    pub operator_address: Address,
    /// Operator public key; its derived address is the second
    /// privileged account.
    pub operator_public_key: [u8; 64],
    /// Sweeper timing and concurrency.
    pub sweeper: SweeperConfig,
    /// RocksDB directory. Unset means in-memory storage.
    pub db_path: Option<PathBuf>,
}

impl NodeConfig {
    /// Load from the environment.
    pub fn from_env() -> Result<Self> {
        let operator_address = std::env::var("RELAY_OPERATOR_ADDRESS")
            .context("RELAY_OPERATOR_ADDRESS is not set")
            .and_then(|raw| {
                parse_address(&raw).context("RELAY_OPERATOR_ADDRESS is not a valid address")
            })?;

        let operator_public_key = std::env::var("RELAY_OPERATOR_PUBKEY")
            .context("RELAY_OPERATOR_PUBKEY is not set")
            .and_then(|raw| {
                parse_public_key(&raw)
                    .context("RELAY_OPERATOR_PUBKEY is not a 64-byte public key")
            })?;

        let mut sweeper = SweeperConfig::default();
        if let Ok(raw) = std::env::var("RELAY_SWEEP_INTERVAL_SECS") {
            sweeper.interval_secs = raw
                .parse()
                .context("RELAY_SWEEP_INTERVAL_SECS is not a number")?;
        }
        if let Ok(raw) = std::env::var("RELAY_SWEEP_MAX_CONCURRENT") {
            sweeper.max_concurrent = raw
                .parse()
                .context("RELAY_SWEEP_MAX_CONCURRENT is not a number")?;
        }

        let db_path = std::env::var("RELAY_DB_PATH").ok().map(PathBuf::from);

        let config = Self {
            operator_address,
            operator_public_key,
            sweeper,
            db_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would run without a real operator.
    pub fn validate(&self) -> Result<()> {
        if self.operator_address == ZERO_ADDRESS {
            bail!("RELAY_OPERATOR_ADDRESS must not be the zero address");
        }
        if self.sweeper.interval_secs == 0 {
            bail!("RELAY_SWEEP_INTERVAL_SECS must be at least 1");
        }
        if self.sweeper.max_concurrent == 0 {
            bail!("RELAY_SWEEP_MAX_CONCURRENT must be at least 1");
        }
        Ok(())
    }
}
