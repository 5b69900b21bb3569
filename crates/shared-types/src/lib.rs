//! # Shared Types Crate
//!
//! Primitive ledger types shared across the relay workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every crate that talks about an address,
//!   a transaction hash or a function selector uses the aliases defined
//!   here, never a local redefinition.
//! - **Bytes internally, hex at the boundary**: all types are fixed-width
//!   byte arrays; the `encoding` module owns the translation to and from
//!   the lower-case hex strings the ledger's RPC surface speaks.

pub mod encoding;
pub mod entities;

pub use encoding::*;
pub use entities::*;
