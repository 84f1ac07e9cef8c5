//! Typed domain-object client for Bitcoin-compatible wallet daemons.
//!
//! Wraps a daemon's JSON-RPC interface in object handles for chain
//! entities (blocks, transactions, accounts, addresses) with per-client
//! identity caching, a precise error taxonomy, transparent pagination of
//! unbounded listings, and height-based incremental sync.

pub mod cache;
pub mod client;
pub mod entity;
pub mod error;
pub mod rpc;
pub mod types;

#[cfg(test)]
mod test_util;

pub use client::Client;
pub use entity::{Account, Address, Block, Transaction};
pub use error::{CoreError, RpcError};
pub use types::{AddressLike, BlockHeight, BlockRef};
