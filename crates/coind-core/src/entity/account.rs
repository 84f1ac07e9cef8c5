use std::sync::Arc;

use bitcoin::Amount;

use crate::client::Client;
use crate::entity::{Address, Transaction};
use crate::error::CoreError;
use crate::types::AddressLike;

/// A wallet account label. The empty string is the daemon's default
/// account.
///
/// Accounts are identity anchors only: balance and address membership
/// change at any time with external chain activity, so every attribute
/// read goes to the daemon. Only the canonical instance itself is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    name: String,
}

impl Account {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// Current balance, counting transactions with at least `minconf`
    /// confirmations (daemon default when `None`).
    pub async fn balance(
        &self,
        client: &Client,
        minconf: Option<u32>,
    ) -> Result<Amount, CoreError> {
        client.balance(Some(&self.name), minconf).await
    }

    /// All addresses currently assigned to this account.
    pub async fn addresses(&self, client: &Client) -> Result<Vec<Arc<Address>>, CoreError> {
        client.account_addresses(&self.name).await
    }

    /// The account's current receiving address.
    pub async fn receiving_address(&self, client: &Client) -> Result<Arc<Address>, CoreError> {
        client.account_receiving_address(&self.name).await
    }

    /// Generate a fresh address assigned to this account.
    pub async fn new_address(&self, client: &Client) -> Result<Arc<Address>, CoreError> {
        client.new_address(Some(&self.name)).await
    }

    /// The complete, deduplicated transaction history for this account,
    /// assembled from the daemon's paginated listing.
    pub async fn transactions(&self, client: &Client) -> Result<Vec<Arc<Transaction>>, CoreError> {
        client.account_transactions(&self.name).await
    }

    /// Send `amount` from this account to `dest`.
    pub async fn send(
        &self,
        client: &Client,
        dest: impl AddressLike,
        amount: Amount,
    ) -> Result<Arc<Transaction>, CoreError> {
        client.send_from(&self.name, dest, amount).await
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_default() {
            write!(f, "(default)")
        } else {
            self.name.fmt(f)
        }
    }
}
