use std::sync::Arc;

use bitcoin::{BlockHash, Txid, TxMerkleNode};
use serde::Deserialize;

use crate::client::Client;
use crate::error::CoreError;
use crate::types::BlockHeight;

/// A block as reported by `getblock`, hydrated once and cached by hash.
///
/// Only fields that are immutable once a block exists are stored; anything
/// that changes as the chain grows (confirmation count) is deliberately not
/// captured. Height is monotonic along the `previous` → `next` chain.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub hash: BlockHash,
    pub height: BlockHeight,
    pub version: i32,
    #[serde(rename = "merkleroot")]
    pub merkle_root: TxMerkleNode,
    /// Creation timestamp, unix seconds.
    pub time: u64,
    pub nonce: u64,
    pub difficulty: f64,
    /// Ordered ids of the transactions contained in this block.
    #[serde(default)]
    pub tx: Vec<Txid>,
    /// Absent at the chain origin.
    #[serde(rename = "previousblockhash")]
    pub previous_block_hash: Option<BlockHash>,
    /// Absent at the chain tip.
    #[serde(rename = "nextblockhash")]
    pub next_block_hash: Option<BlockHash>,
}

impl Block {
    /// The previous block through the cache, or `None` at the chain origin.
    pub async fn previous(&self, client: &Client) -> Result<Option<Arc<Block>>, CoreError> {
        match self.previous_block_hash {
            None => Ok(None),
            Some(hash) => client.block(&hash).await.map(Some),
        }
    }

    /// The next block through the cache, or `None` at the chain tip.
    pub async fn next(&self, client: &Client) -> Result<Option<Arc<Block>>, CoreError> {
        match self.next_block_hash {
            None => Ok(None),
            Some(hash) => client.block(&hash).await.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::block_hash_from_byte;

    /// Pins the neighbor field mapping to the daemon schema:
    /// `previousblockhash` is the lower block, `nextblockhash` the higher.
    #[test]
    fn neighbors_follow_daemon_field_names() {
        let prev = block_hash_from_byte(1);
        let next = block_hash_from_byte(3);
        let hash = block_hash_from_byte(2);

        let block: Block = serde_json::from_value(serde_json::json!({
            "hash": hash.to_string(),
            "confirmations": 42,
            "size": 215,
            "height": 2,
            "version": 2,
            "merkleroot": "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
            "tx": ["4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"],
            "time": 1_231_469_665u64,
            "nonce": 2_573_394_689u64,
            "bits": "1d00ffff",
            "difficulty": 1.0,
            "previousblockhash": prev.to_string(),
            "nextblockhash": next.to_string(),
        }))
        .expect("getblock fixture must parse");

        assert_eq!(block.hash, hash);
        assert_eq!(block.previous_block_hash, Some(prev));
        assert_eq!(block.next_block_hash, Some(next));
        assert_eq!(block.height, BlockHeight(2));
        assert_eq!(block.tx.len(), 1);
    }

    #[test]
    fn chain_boundaries_have_no_neighbor_ids() {
        let block: Block = serde_json::from_value(serde_json::json!({
            "hash": block_hash_from_byte(0).to_string(),
            "height": 0,
            "version": 1,
            "merkleroot": "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
            "tx": [],
            "time": 1_231_006_505u64,
            "nonce": 2_083_236_893u64,
            "difficulty": 1.0,
        }))
        .expect("origin block fixture must parse");

        assert!(block.previous_block_hash.is_none());
        assert!(block.next_block_hash.is_none());
    }
}
