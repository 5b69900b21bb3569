//! # Relay Core
//!
//! The submission–classification–reconciliation pipeline between the
//! platform and the ledger network. Callers hand the relay pre-signed
//! operations; the relay authorizes the recovered sender, classifies the
//! encoded call, durably records it as pending, broadcasts it, and
//! converges the record onto the ledger's verdict through two
//! independent completers.
//!
//! ## Confirmation is dual-path
//!
//! ```text
//! caller ──→ submission pipeline ──→ store (PENDING) ──→ ledger broadcast
//!                                          ▲                   │
//!                                          │          ┌────────┴────────┐
//!                            idempotent terminal      │                 │
//!                                 upsert              ↓                 ↓
//!                                          receipt subscription   reconciliation
//!                                            (best effort)        sweeper (ticks)
//! ```
//!
//! The subscription may confirm within moments, or never; the sweeper
//! re-queries every pending record each tick and is the guaranteed path.
//! Both write the terminal state through the same idempotent upsert, so
//! their race is safe by construction.
//!
//! ## Invariants
//!
//! - The pending row is durably committed before the broadcast call is
//!   made; identity is re-keyed if the ledger assigns a different hash.
//! - Terminal states (`Mined`, `Failed`) are absorbing; re-observing a
//!   terminal receipt is a no-op, not an error.
//! - Records are never deleted by the core.
//! - The classifier table and privileged-account set are immutable
//!   process-wide configuration, injected at construction.
//!
//! ## Hexagonal layout
//!
//! - `domain/`: pure types and logic, no I/O
//! - `ports/`: inbound API trait and outbound SPI traits
//! - `service/`: the pipeline and the sweeper
//! - `adapters/`: stores, clocks, the framed dev codec, the simulated
//!   ledger client

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::SweeperConfig;
pub use domain::{
    address_from_public_key, calldata, keccak256, selector_of, CodecError, LedgerError,
    OperationKind, PrivilegedAccounts, RelayError, SelectorTable, StoreError, TerminalState,
    TransactionRecord, TxState, WalletRecord,
};
pub use ports::{
    DecodedPayload, LedgerClient, PayloadCodec, Receipt, ReceiptLog, RelayApi, TerminalWrite,
    TimeSource, TransactionStore,
};
pub use service::{ReconciliationSweeper, RelayService, SweepReport};
