//! Wallet daemon RPC abstraction layer.
//!
//! Defines the [`WalletRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockRpc`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::HttpRpcClient;

use async_trait::async_trait;

use crate::error::CoreError;

/// The single transport boundary this crate consumes: one JSON-RPC method
/// call against a Bitcoin-compatible wallet daemon.
///
/// Implementations are expected to handle authentication, connection
/// management, and deadline enforcement internally. Daemon-reported
/// failures surface as `RpcError::ServerError { code, message }` inside
/// [`CoreError::Rpc`]; connection and timeout failures use the distinct
/// `Transport` / `Timeout` kinds.
#[async_trait]
pub trait WalletRpc: Send + Sync {
    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError>;
}
