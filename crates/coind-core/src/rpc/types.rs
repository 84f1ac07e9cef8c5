//! Raw RPC payload shapes.
//!
//! These structs mirror the daemon's JSON field names (serde renames map
//! them onto Rust naming) and exist only at the deserialization boundary;
//! domain entities are built from them. BTC-denominated floats deserialize
//! through `bitcoin::amount::serde::as_btc` rather than bare `f64`.

use bitcoin::{Amount, BlockHash, SignedAmount, Txid};
use serde::Deserialize;

use crate::types::BlockHeight;

// ==============================================================================
// Wallet Transactions
// ==============================================================================

/// One entry of a `gettransaction` `details` array.
#[derive(Debug, Clone, Deserialize)]
pub struct TxDetail {
    #[serde(default)]
    pub account: Option<String>,
    /// Absent for entries that do not touch an address (e.g. `move`).
    #[serde(default)]
    pub address: Option<String>,
    pub category: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: SignedAmount,
    /// Present on `send` entries only; reported negative by the daemon.
    #[serde(default, with = "bitcoin::amount::serde::as_btc::opt")]
    pub fee: Option<SignedAmount>,
}

/// A `gettransaction` result.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWalletTx {
    pub txid: Txid,
    #[serde(default)]
    pub time: Option<u64>,
    #[serde(default)]
    pub details: Vec<TxDetail>,
}

/// One entry of a `listtransactions` / `listsinceblock` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListedTx {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub category: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: SignedAmount,
    #[serde(default, with = "bitcoin::amount::serde::as_btc::opt")]
    pub fee: Option<SignedAmount>,
    #[serde(default)]
    pub confirmations: Option<i64>,
    pub txid: Txid,
    #[serde(default)]
    pub time: Option<u64>,
}

/// A `listsinceblock` result: the listing plus the daemon's new cursor.
#[derive(Debug, Clone, Deserialize)]
pub struct SinceBlockPage {
    #[serde(default)]
    pub transactions: Vec<ListedTx>,
    #[serde(rename = "lastblock")]
    pub last_block: BlockHash,
}

// ==============================================================================
// Addresses
// ==============================================================================

/// A `validateaddress` result.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationInfo {
    #[serde(rename = "isvalid")]
    pub is_valid: bool,
    /// Canonical form of the checked address; absent when invalid.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "ismine")]
    pub is_mine: bool,
    #[serde(default)]
    pub account: Option<String>,
}

/// One entry of `listreceivedbyaddress`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedByAddress {
    pub address: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    pub confirmations: i64,
}

/// One entry of `listreceivedbyaccount`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedByAccount {
    pub account: String,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    pub confirmations: i64,
}

// ==============================================================================
// Node State
// ==============================================================================

/// A `getinfo` result.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    pub version: i64,
    #[serde(default, rename = "protocolversion")]
    pub protocol_version: i64,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub balance: Amount,
    pub blocks: BlockHeight,
    pub connections: u64,
    pub difficulty: f64,
    #[serde(default)]
    pub testnet: bool,
    #[serde(default, rename = "keypoololdest")]
    pub keypool_oldest: u64,
    #[serde(default, rename = "keypoolsize")]
    pub keypool_size: u64,
    #[serde(default, rename = "paytxfee", with = "bitcoin::amount::serde::as_btc::opt")]
    pub pay_tx_fee: Option<Amount>,
    #[serde(default)]
    pub errors: Option<String>,
}

/// A `getmemorypool` result (the pre-getblocktemplate mining surface).
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryPool {
    pub version: i64,
    #[serde(rename = "previousblockhash")]
    pub previous_block_hash: BlockHash,
    /// Hex-encoded transactions awaiting inclusion.
    #[serde(default)]
    pub transactions: Vec<String>,
    /// Maximum allowable coinbase output, in satoshis.
    #[serde(rename = "coinbasevalue")]
    pub coinbase_value: u64,
    #[serde(default, rename = "mintime")]
    pub min_time: u64,
    #[serde(default, rename = "curtime")]
    pub cur_time: u64,
    #[serde(default)]
    pub bits: String,
}
