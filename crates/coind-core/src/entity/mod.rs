//! Domain entity models: blocks, transactions, accounts, and addresses.
//!
//! Each entity is an immutable value record hydrated once from an RPC
//! response and cached by identity in the owning client's
//! [`EntityCache`](crate::cache::EntityCache). Relationship accessors take
//! the client explicitly and go through the cache, so traversal always
//! reflects current cache state and converges on canonical instances.

mod account;
mod address;
mod block;
mod transaction;

pub use account::Account;
pub use address::Address;
pub use block::Block;
pub use transaction::Transaction;
