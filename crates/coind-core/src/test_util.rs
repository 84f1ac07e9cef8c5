//! Shared test helpers for `coind-core` unit tests.
//!
//! Consolidates deterministic id builders and raw daemon-payload fixtures
//! (`block_json`, `wallet_tx_json`, `listed_tx_json`) so that tests across
//! modules share a single source of truth for dummy data construction.

use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, Txid, TxMerkleNode};
use serde_json::json;

use crate::entity::Block;
use crate::types::BlockHeight;

// ==============================================================================
// Id Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

/// Create a deterministic `BlockHash` from a single distinguishing byte.
pub fn block_hash_from_byte(b: u8) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    BlockHash::from_byte_array(bytes)
}

// ==============================================================================
// Fixtures
// ==============================================================================

/// Build a minimal domain `Block` for cache-level tests.
pub fn block_fixture(hash: BlockHash, height: u64) -> Block {
    Block {
        hash,
        height: BlockHeight(height),
        version: 2,
        merkle_root: TxMerkleNode::all_zeros(),
        time: 1_700_000_000,
        nonce: 0,
        difficulty: 1.0,
        tx: Vec::new(),
        previous_block_hash: None,
        next_block_hash: None,
    }
}

/// A `getblock` response payload with optional neighbors.
pub fn block_json(
    hash: &BlockHash,
    height: u64,
    prev: Option<&BlockHash>,
    next: Option<&BlockHash>,
) -> serde_json::Value {
    let mut value = json!({
        "hash": hash.to_string(),
        "confirmations": 1,
        "size": 215,
        "height": height,
        "version": 2,
        "merkleroot": TxMerkleNode::all_zeros().to_string(),
        "tx": [],
        "time": 1_700_000_000u64,
        "nonce": 0u64,
        "bits": "1d00ffff",
        "difficulty": 1.0,
    });
    if let Some(prev) = prev {
        value["previousblockhash"] = json!(prev.to_string());
    }
    if let Some(next) = next {
        value["nextblockhash"] = json!(next.to_string());
    }
    value
}

/// A `gettransaction` response payload. Details are
/// `(address, category, amount_btc, fee_btc)` tuples.
pub fn wallet_tx_json(txid: &Txid, details: &[(&str, &str, f64, Option<f64>)]) -> serde_json::Value {
    let details: Vec<serde_json::Value> = details
        .iter()
        .map(|(address, category, amount, fee)| {
            let mut detail = json!({
                "account": "",
                "address": address,
                "category": category,
                "amount": amount,
            });
            if let Some(fee) = fee {
                detail["fee"] = json!(fee);
            }
            detail
        })
        .collect();

    json!({
        "txid": txid.to_string(),
        "time": 1_700_000_000u64,
        "confirmations": 6,
        "details": details,
    })
}

/// One `listtransactions` / `listsinceblock` entry.
pub fn listed_tx_json(txid: &Txid, address: &str, category: &str, amount: f64) -> serde_json::Value {
    json!({
        "account": "",
        "address": address,
        "category": category,
        "amount": amount,
        "confirmations": 3,
        "txid": txid.to_string(),
        "time": 1_700_000_000u64,
    })
}
