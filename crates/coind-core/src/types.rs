//! Shared domain primitives: block heights, sync cursors, and the
//! `AddressLike` parameter trait used at API boundaries that accept either
//! an address string or an [`Address`] entity.

use std::sync::Arc;

use bitcoin::BlockHash;
use serde::{Deserialize, Serialize};

use crate::entity::Block;

// ==============================================================================
// Block Height
// ==============================================================================

/// A chain height, wrapped for type safety.
///
/// `#[serde(transparent)]` preserves the JSON representation as a bare
/// integer, so this newtype is wire-compatible with plain `u64`.
/// `Deref<Target = u64>` minimises call-site churn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl From<u64> for BlockHeight {
    fn from(h: u64) -> Self {
        Self(h)
    }
}

impl From<BlockHeight> for u64 {
    fn from(h: BlockHeight) -> Self {
        h.0
    }
}

impl std::ops::Deref for BlockHeight {
    type Target = u64;
    fn deref(&self) -> &u64 {
        &self.0
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ==============================================================================
// Sync Cursor
// ==============================================================================

/// A reference to a block, used as the cursor for incremental transaction
/// scanning. Heights and hashes are both resolved to the canonical cached
/// [`Block`] before use, so repeated calls with the same height reuse one
/// instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Hash(BlockHash),
    Height(BlockHeight),
}

impl From<BlockHash> for BlockRef {
    fn from(hash: BlockHash) -> Self {
        Self::Hash(hash)
    }
}

impl From<BlockHeight> for BlockRef {
    fn from(height: BlockHeight) -> Self {
        Self::Height(height)
    }
}

impl From<u64> for BlockRef {
    fn from(height: u64) -> Self {
        Self::Height(BlockHeight(height))
    }
}

impl From<&Block> for BlockRef {
    fn from(block: &Block) -> Self {
        Self::Hash(block.hash)
    }
}

impl From<&Arc<Block>> for BlockRef {
    fn from(block: &Arc<Block>) -> Self {
        Self::Hash(block.hash)
    }
}

// ==============================================================================
// AddressLike
// ==============================================================================

/// Anything that can stand in for an address at an API boundary: a plain
/// string, an owned `String`, or a cached [`Address`](crate::entity::Address)
/// entity.
pub trait AddressLike {
    /// The canonical base58 string for this address.
    fn as_address_str(&self) -> &str;
}

impl AddressLike for str {
    fn as_address_str(&self) -> &str {
        self
    }
}

impl AddressLike for String {
    fn as_address_str(&self) -> &str {
        self
    }
}

impl<T: AddressLike + ?Sized> AddressLike for &T {
    fn as_address_str(&self) -> &str {
        (**self).as_address_str()
    }
}

impl<T: AddressLike + ?Sized> AddressLike for Arc<T> {
    fn as_address_str(&self) -> &str {
        (**self).as_address_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_height_display_and_deref() {
        let height = BlockHeight(120_000);
        assert_eq!(height.to_string(), "120000");
        assert_eq!(*height, 120_000);
    }

    #[test]
    fn block_ref_from_height_integer() {
        assert_eq!(BlockRef::from(7u64), BlockRef::Height(BlockHeight(7)));
    }

    #[test]
    fn address_like_accepts_strings() {
        fn canonical(a: impl AddressLike) -> String {
            a.as_address_str().to_owned()
        }
        assert_eq!(canonical("mxAddr"), "mxAddr");
        assert_eq!(canonical(String::from("mxAddr")), "mxAddr");
        assert_eq!(canonical(&String::from("mxAddr")), "mxAddr");
    }
}
