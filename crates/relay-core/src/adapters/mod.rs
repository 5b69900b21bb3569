//! Adapters layer: concrete implementations of the outbound ports.

pub mod clock;
pub mod codec;
pub mod memory_store;
#[cfg(feature = "rocksdb")]
pub mod rocks_store;
pub mod sim_ledger;

pub use clock::{FixedClock, SystemClock};
pub use codec::FramedPayloadCodec;
pub use memory_store::InMemoryRelayStore;
#[cfg(feature = "rocksdb")]
pub use rocks_store::{RocksRelayStore, RocksStoreConfig};
pub use sim_ledger::SimulatedLedger;
