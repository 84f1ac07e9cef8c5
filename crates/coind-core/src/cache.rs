//! Per-client identity caches for domain entities.
//!
//! Each map guarantees at most one canonical instance per remote ID for the
//! lifetime of the owning [`Client`](crate::Client): reference equality
//! implies entity equality, and graph traversal always converges on the
//! same objects. There is no eviction and no TTL — only fields that are
//! immutable in the remote system once created are ever cached.

use std::collections::HashMap;
use std::sync::Arc;

use bitcoin::{BlockHash, Txid};
use tokio::sync::RwLock;

use crate::entity::{Account, Address, Block, Transaction};

/// In-memory identity maps for blocks, transactions, accounts, and
/// addresses. Uses `tokio::sync::RwLock` for async-friendly concurrent
/// access; insertion goes through `entry().or_insert_with()` under the
/// write lock, so racing first-lookups converge on one canonical `Arc`.
pub struct EntityCache {
    blocks: RwLock<HashMap<BlockHash, Arc<Block>>>,
    transactions: RwLock<HashMap<Txid, Arc<Transaction>>>,
    accounts: RwLock<HashMap<String, Arc<Account>>>,
    addresses: RwLock<HashMap<String, Arc<Address>>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
            transactions: RwLock::new(HashMap::new()),
            accounts: RwLock::new(HashMap::new()),
            addresses: RwLock::new(HashMap::new()),
        }
    }

    pub async fn block(&self, hash: &BlockHash) -> Option<Arc<Block>> {
        self.blocks.read().await.get(hash).cloned()
    }

    /// Store a freshly hydrated block, or return the instance that won an
    /// earlier race for the same hash.
    pub async fn insert_block(&self, block: Block) -> Arc<Block> {
        let hash = block.hash;
        let mut map = self.blocks.write().await;
        Arc::clone(map.entry(hash).or_insert_with(|| Arc::new(block)))
    }

    pub async fn transaction(&self, txid: &Txid) -> Option<Arc<Transaction>> {
        self.transactions.read().await.get(txid).cloned()
    }

    pub async fn insert_transaction(&self, tx: Transaction) -> Arc<Transaction> {
        let txid = tx.txid();
        let mut map = self.transactions.write().await;
        Arc::clone(map.entry(txid).or_insert_with(|| Arc::new(tx)))
    }

    /// Accounts are identity anchors with no hydrating RPC, so lookup and
    /// insertion collapse into one operation. `""` is the default account.
    pub async fn account(&self, name: &str) -> Arc<Account> {
        let mut map = self.accounts.write().await;
        Arc::clone(
            map.entry(name.to_owned())
                .or_insert_with(|| Arc::new(Account::new(name))),
        )
    }

    pub async fn address(&self, address: &str) -> Option<Arc<Address>> {
        self.addresses.read().await.get(address).cloned()
    }

    pub async fn insert_address(&self, address: Address) -> Arc<Address> {
        let key = address.as_str().to_owned();
        let mut map = self.addresses.write().await;
        Arc::clone(map.entry(key).or_insert_with(|| Arc::new(address)))
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{block_fixture, block_hash_from_byte};

    #[tokio::test]
    async fn repeated_block_insert_keeps_first_instance() {
        let cache = EntityCache::new();
        let hash = block_hash_from_byte(1);

        let first = cache.insert_block(block_fixture(hash, 10)).await;
        let second = cache.insert_block(block_fixture(hash, 10)).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(
            &first,
            &cache.block(&hash).await.expect("block must be cached")
        ));
    }

    #[tokio::test]
    async fn account_lookup_is_identity_stable() {
        let cache = EntityCache::new();
        let default_a = cache.account("").await;
        let default_b = cache.account("").await;
        let savings = cache.account("savings").await;

        assert!(Arc::ptr_eq(&default_a, &default_b));
        assert!(!Arc::ptr_eq(&default_a, &savings));
        assert!(default_a.is_default());
    }

    #[tokio::test]
    async fn address_insert_keyed_by_string() {
        let cache = EntityCache::new();
        let first = cache
            .insert_address(Address::new("mxAddr".to_owned(), true))
            .await;
        let second = cache
            .insert_address(Address::new("mxAddr".to_owned(), false))
            .await;

        assert!(Arc::ptr_eq(&first, &second));
        // The race loser's differing flags never replace the canonical entry.
        assert!(second.is_mine());
    }
}
