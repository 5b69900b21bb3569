//! Ports layer: the relay core's driving and driven interfaces.
//!
//! - Inbound (driving): [`inbound::RelayApi`], consumed by the RPC boundary.
//! - Outbound (driven): SPIs implemented by adapters (ledger client,
//!   payload codec, transaction store, clock).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
