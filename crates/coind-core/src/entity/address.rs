use std::sync::Arc;

use crate::client::Client;
use crate::entity::Account;
use crate::error::CoreError;
use crate::types::AddressLike;

/// A daemon-validated address.
///
/// Construction goes through `validateaddress`, so an `Address` that
/// exists is valid for the daemon's network (mainnet vs testnet) by
/// definition. The owning account is reassignable and therefore never
/// stored: [`Address::account`] is a fresh RPC call every time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    address: String,
    is_mine: bool,
}

impl Address {
    pub(crate) fn new(address: String, is_mine: bool) -> Self {
        Self { address, is_mine }
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Whether the daemon's wallet held the key when this address was
    /// hydrated.
    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// The account currently owning this address, through the account
    /// cache. The default account owns addresses without an explicit
    /// assignment.
    pub async fn account(&self, client: &Client) -> Result<Arc<Account>, CoreError> {
        client.account_for(self.as_str()).await
    }

    /// Reassign this address to the named account.
    pub async fn set_account(
        &self,
        client: &Client,
        name: &str,
    ) -> Result<Arc<Account>, CoreError> {
        client.set_account(self.as_str(), name).await
    }

    /// The private key for this address, or `None` when the daemon holds
    /// no key for it. Requires an unlocked wallet.
    pub async fn private_key(&self, client: &Client) -> Result<Option<String>, CoreError> {
        client.dump_private_key(self.as_str()).await
    }

    /// Sign `message` with this address's key. Requires an unlocked wallet
    /// and a key the daemon holds.
    pub async fn sign_message(
        &self,
        client: &Client,
        message: &str,
    ) -> Result<String, CoreError> {
        client.sign_message(self.as_str(), message).await
    }

    /// Verify a signature made over `message` by this address's key.
    pub async fn verify_message(
        &self,
        client: &Client,
        signature: &str,
        message: &str,
    ) -> Result<bool, CoreError> {
        client.verify_message(self.as_str(), signature, message).await
    }
}

impl AddressLike for Address {
    fn as_address_str(&self) -> &str {
        &self.address
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.address.fmt(f)
    }
}
