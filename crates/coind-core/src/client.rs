//! Client orchestration: cached entity lookup, pagination, incremental
//! sync, currency-moving operations, and wallet lifecycle.
//!
//! The [`Client`] owns the per-client [`EntityCache`] and drives every RPC
//! through the [`WalletRpc`] boundary, translating daemon error codes into
//! the domain taxonomy at each call site.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bitcoin::{Amount, BlockHash, Txid};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::cache::EntityCache;
use crate::entity::{Account, Address, Block, Transaction};
use crate::error::{map_wallet_error, CoreError, ErrorContext, RpcError};
use crate::rpc::types::{
    ListedTx, MemoryPool, NodeInfo, RawWalletTx, ReceivedByAccount, ReceivedByAddress,
    SinceBlockPage, ValidationInfo,
};
use crate::rpc::WalletRpc;
use crate::types::{AddressLike, BlockHeight, BlockRef};

/// Default page size for the paginated listing RPCs.
const DEFAULT_PAGE_SIZE: usize = 20;

/// A typed domain-object client over a wallet daemon's JSON-RPC interface.
///
/// Owns the identity caches; entities obtained from one client are
/// canonical for that client's lifetime, so reference equality implies
/// entity equality.
pub struct Client {
    rpc: Arc<dyn WalletRpc>,
    cache: EntityCache,
    page_size: usize,
}

impl Client {
    pub fn new(rpc: Arc<dyn WalletRpc>) -> Self {
        Self {
            rpc,
            cache: EntityCache::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the listing page size. Values below 1 are clamped.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    // ==========================================================================
    // Entity Lookup
    // ==========================================================================

    /// The canonical block for `hash`, hydrating it via `getblock` on first
    /// use.
    pub async fn block(&self, hash: &BlockHash) -> Result<Arc<Block>, CoreError> {
        if let Some(block) = self.cache.block(hash).await {
            return Ok(block);
        }

        let raw = self
            .rpc
            .call("getblock", vec![json!(hash.to_string())])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::BlockLookup(hash), e))?;
        let block: Block = decode("getblock", raw)?;
        Ok(self.cache.insert_block(block).await)
    }

    /// The canonical block at `height`. The height is resolved to a hash
    /// via `getblockhash` first, so both lookup keys converge on the same
    /// cached instance.
    pub async fn block_at(&self, height: impl Into<BlockHeight>) -> Result<Arc<Block>, CoreError> {
        let height = height.into();
        let raw = self
            .rpc
            .call("getblockhash", vec![json!(height.0)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::BlockByHeight(height), e))?;
        let hash: BlockHash = decode("getblockhash", raw)?;
        self.block(&hash).await
    }

    /// The canonical wallet transaction for `txid`, hydrating it via
    /// `gettransaction` on first use.
    pub async fn transaction(&self, txid: &Txid) -> Result<Arc<Transaction>, CoreError> {
        if let Some(tx) = self.cache.transaction(txid).await {
            return Ok(tx);
        }

        let raw = self
            .rpc
            .call("gettransaction", vec![json!(txid.to_string())])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::TransactionLookup(txid), e))?;
        let raw: RawWalletTx = decode("gettransaction", raw)?;
        let tx = Transaction::from_raw(raw)?;
        Ok(self.cache.insert_transaction(tx).await)
    }

    /// The canonical account for `name`. `""` is the default account.
    pub async fn account(&self, name: &str) -> Arc<Account> {
        self.cache.account(name).await
    }

    /// The canonical address entity for `address`, validating it against
    /// the daemon's network on first use. Invalid addresses fail
    /// construction with [`CoreError::InvalidAddress`].
    pub async fn address(&self, address: &str) -> Result<Arc<Address>, CoreError> {
        if let Some(entity) = self.cache.address(address).await {
            return Ok(entity);
        }

        let info = self.validate_address(address).await?;
        if !info.is_valid {
            return Err(CoreError::InvalidAddress(address.to_owned()));
        }
        let canonical = info.address.unwrap_or_else(|| address.to_owned());
        Ok(self
            .cache
            .insert_address(Address::new(canonical, info.is_mine))
            .await)
    }

    /// Raw `validateaddress` result, uncached.
    pub async fn validate_address(&self, address: &str) -> Result<ValidationInfo, CoreError> {
        let raw = self
            .rpc
            .call("validateaddress", vec![json!(address)])
            .await?;
        decode("validateaddress", raw)
    }

    /// Generate a fresh wallet address, optionally assigned to an account.
    pub async fn new_address(&self, account: Option<&str>) -> Result<Arc<Address>, CoreError> {
        let params = match account {
            Some(account) => vec![json!(account)],
            None => Vec::new(),
        };
        let raw = self
            .rpc
            .call("getnewaddress", params)
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Wallet, e))?;
        let address: String = decode("getnewaddress", raw)?;
        self.address(&address).await
    }

    /// The account currently owning `address`, through the account cache.
    pub async fn account_for(&self, address: impl AddressLike) -> Result<Arc<Account>, CoreError> {
        let address = address.as_address_str().to_owned();
        let raw = self
            .rpc
            .call("getaccount", vec![json!(&address)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::AddressUse(&address), e))?;
        let name: String = decode("getaccount", raw)?;
        Ok(self.cache.account(&name).await)
    }

    /// Reassign `address` to the named account.
    pub async fn set_account(
        &self,
        address: impl AddressLike,
        name: &str,
    ) -> Result<Arc<Account>, CoreError> {
        let address = address.as_address_str().to_owned();
        self.rpc
            .call("setaccount", vec![json!(&address), json!(name)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::AddressUse(&address), e))?;
        Ok(self.cache.account(name).await)
    }

    // ==========================================================================
    // Account Reads (always fresh; never served from cache)
    // ==========================================================================

    /// Wallet balance, or the balance of one account when given.
    pub async fn balance(
        &self,
        account: Option<&str>,
        minconf: Option<u32>,
    ) -> Result<Amount, CoreError> {
        let mut params = Vec::new();
        if account.is_some() || minconf.is_some() {
            params.push(json!(account.unwrap_or("")));
        }
        if let Some(minconf) = minconf {
            params.push(json!(minconf));
        }
        let raw = self.rpc.call("getbalance", params).await?;
        let btc: f64 = decode("getbalance", raw)?;
        Amount::from_btc(btc)
            .map_err(|e| CoreError::InvalidData(format!("invalid getbalance result: {e}")))
    }

    pub(crate) async fn account_addresses(
        &self,
        account: &str,
    ) -> Result<Vec<Arc<Address>>, CoreError> {
        let raw = self
            .rpc
            .call("getaddressesbyaccount", vec![json!(account)])
            .await?;
        let addresses: Vec<String> = decode("getaddressesbyaccount", raw)?;

        let mut out = Vec::with_capacity(addresses.len());
        for address in &addresses {
            out.push(self.address(address).await?);
        }
        Ok(out)
    }

    pub(crate) async fn account_receiving_address(
        &self,
        account: &str,
    ) -> Result<Arc<Address>, CoreError> {
        let raw = self
            .rpc
            .call("getaccountaddress", vec![json!(account)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Wallet, e))?;
        let address: String = decode("getaccountaddress", raw)?;
        self.address(&address).await
    }

    /// The complete, deduplicated transaction history for an account,
    /// regardless of the daemon's page-size limits.
    ///
    /// Pages through `listtransactions` with a fixed page size and an
    /// increasing offset until a short page signals end-of-data. Listings
    /// may overlap across page boundaries under concurrent chain activity,
    /// so ids are deduplicated (first-seen order) before hydration. A
    /// failure mid-iteration propagates; partial results are never
    /// observable.
    pub(crate) async fn account_transactions(
        &self,
        account: &str,
    ) -> Result<Vec<Arc<Transaction>>, CoreError> {
        let mut seen: HashSet<Txid> = HashSet::new();
        let mut txids: Vec<Txid> = Vec::new();
        let mut offset = 0usize;

        loop {
            let raw = self
                .rpc
                .call(
                    "listtransactions",
                    vec![json!(account), json!(self.page_size), json!(offset)],
                )
                .await?;
            let page: Vec<ListedTx> = decode("listtransactions", raw)?;
            let page_len = page.len();
            debug!(account, offset, page_len, "listtransactions page");

            for entry in page {
                if seen.insert(entry.txid) {
                    txids.push(entry.txid);
                }
            }

            if page_len < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        let mut out = Vec::with_capacity(txids.len());
        for txid in &txids {
            out.push(self.transaction(txid).await?);
        }
        Ok(out)
    }

    // ==========================================================================
    // Incremental Sync
    // ==========================================================================

    /// Invoke `f` once per new unique transaction observed since the cursor
    /// block, in listing order, and return the canonical block for the
    /// daemon's reported new cursor position.
    ///
    /// A transaction touching multiple owned addresses is reported once.
    /// This is the polling primitive for wallet monitoring: feed the
    /// returned block back in as the next cursor.
    pub async fn for_each_transaction_since<F>(
        &self,
        cursor: impl Into<BlockRef>,
        mut f: F,
    ) -> Result<Arc<Block>, CoreError>
    where
        F: FnMut(&Arc<Transaction>),
    {
        let since = self.resolve_cursor(cursor.into()).await?;
        let raw = self
            .rpc
            .call("listsinceblock", vec![json!(since.hash.to_string())])
            .await?;
        let page: SinceBlockPage = decode("listsinceblock", raw)?;
        debug!(
            since = %since.hash,
            listed = page.transactions.len(),
            "listsinceblock"
        );

        let mut seen: HashSet<Txid> = HashSet::new();
        for entry in &page.transactions {
            if !seen.insert(entry.txid) {
                continue;
            }
            let tx = self.transaction(&entry.txid).await?;
            f(&tx);
        }

        self.block(&page.last_block).await
    }

    /// Collecting variant of [`Client::for_each_transaction_since`].
    pub async fn transactions_since(
        &self,
        cursor: impl Into<BlockRef>,
    ) -> Result<(Vec<Arc<Transaction>>, Arc<Block>), CoreError> {
        let mut out = Vec::new();
        let cursor = self
            .for_each_transaction_since(cursor, |tx| out.push(Arc::clone(tx)))
            .await?;
        Ok((out, cursor))
    }

    async fn resolve_cursor(&self, cursor: BlockRef) -> Result<Arc<Block>, CoreError> {
        match cursor {
            BlockRef::Hash(hash) => self.block(&hash).await,
            BlockRef::Height(height) => self.block_at(height).await,
        }
    }

    // ==========================================================================
    // Sends
    // ==========================================================================

    /// Send `amount` to `dest` from the wallet at large (`sendtoaddress`),
    /// resolving the resulting transaction through the cache.
    ///
    /// No local balance pre-check is performed: insufficiency is detected
    /// solely via the daemon's response, which is enriched with the current
    /// balance into [`CoreError::InsufficientFunds`].
    pub async fn send(
        &self,
        dest: impl AddressLike,
        amount: Amount,
    ) -> Result<Arc<Transaction>, CoreError> {
        let dest = dest.as_address_str().to_owned();
        ensure_positive(amount)?;

        match self
            .rpc
            .call(
                "sendtoaddress",
                vec![json!(&dest), json!(amount.to_btc())],
            )
            .await
        {
            Ok(raw) => {
                let txid: Txid = decode("sendtoaddress", raw)?;
                self.transaction(&txid).await
            }
            Err(err) => Err(self.translate_send_error(None, &dest, amount, err).await),
        }
    }

    /// Send `amount` from a specific account (`sendfrom`).
    pub async fn send_from(
        &self,
        account: &str,
        dest: impl AddressLike,
        amount: Amount,
    ) -> Result<Arc<Transaction>, CoreError> {
        let dest = dest.as_address_str().to_owned();
        ensure_positive(amount)?;

        match self
            .rpc
            .call(
                "sendfrom",
                vec![json!(account), json!(&dest), json!(amount.to_btc())],
            )
            .await
        {
            Ok(raw) => {
                let txid: Txid = decode("sendfrom", raw)?;
                self.transaction(&txid).await
            }
            Err(err) => {
                Err(self
                    .translate_send_error(Some(account), &dest, amount, err)
                    .await)
            }
        }
    }

    /// Send to several recipients in one transaction (`sendmany`).
    ///
    /// The daemon takes `(fromaccount, {address: amount, ...})`, in that
    /// order.
    pub async fn send_to_many<A: AddressLike>(
        &self,
        account: &str,
        recipients: &[(A, Amount)],
    ) -> Result<Arc<Transaction>, CoreError> {
        if recipients.is_empty() {
            return Err(CoreError::InvalidData(
                "sendmany requires at least one recipient".to_owned(),
            ));
        }

        let mut amounts = serde_json::Map::with_capacity(recipients.len());
        let mut required = Amount::ZERO;
        for (dest, amount) in recipients {
            ensure_positive(*amount)?;
            required = required.checked_add(*amount).ok_or_else(|| {
                CoreError::InvalidData("sendmany total amount overflows".to_owned())
            })?;
            amounts.insert(dest.as_address_str().to_owned(), json!(amount.to_btc()));
        }

        match self
            .rpc
            .call(
                "sendmany",
                vec![json!(account), serde_json::Value::Object(amounts)],
            )
            .await
        {
            Ok(raw) => {
                let txid: Txid = decode("sendmany", raw)?;
                self.transaction(&txid).await
            }
            Err(err) => {
                // The daemon does not report which recipient it rejected;
                // carry the full destination list.
                let dests = recipients
                    .iter()
                    .map(|(dest, _)| dest.as_address_str())
                    .collect::<Vec<_>>()
                    .join(",");
                Err(self
                    .translate_send_error(Some(account), &dests, required, err)
                    .await)
            }
        }
    }

    async fn translate_send_error(
        &self,
        account: Option<&str>,
        dest: &str,
        required: Amount,
        err: CoreError,
    ) -> CoreError {
        match err {
            CoreError::Rpc(RpcError::ServerError { code: -6, .. }) => {
                match self.balance(account, None).await {
                    Ok(available) => CoreError::InsufficientFunds {
                        required,
                        available,
                    },
                    Err(balance_err) => balance_err,
                }
            }
            other => map_wallet_error(ErrorContext::AddressUse(dest), other),
        }
    }

    // ==========================================================================
    // Wallet Lifecycle
    // ==========================================================================

    /// Unlock the wallet for `timeout`.
    pub async fn unlock(&self, passphrase: &str, timeout: Duration) -> Result<(), CoreError> {
        self.rpc
            .call(
                "walletpassphrase",
                vec![json!(passphrase), json!(timeout.as_secs())],
            )
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Passphrase(passphrase), e))?;
        Ok(())
    }

    pub async fn lock(&self) -> Result<(), CoreError> {
        self.rpc
            .call("walletlock", Vec::new())
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Wallet, e))?;
        Ok(())
    }

    /// Encrypt the wallet. The daemon shuts down afterwards.
    pub async fn encrypt(&self, passphrase: &str) -> Result<(), CoreError> {
        self.rpc
            .call("encryptwallet", vec![json!(passphrase)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Passphrase(passphrase), e))?;
        Ok(())
    }

    pub async fn change_passphrase(&self, old: &str, new: &str) -> Result<(), CoreError> {
        self.rpc
            .call("walletpassphrasechange", vec![json!(old), json!(new)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Passphrase(old), e))?;
        Ok(())
    }

    /// Back up the wallet file to `destination` on the daemon host.
    pub async fn backup(&self, destination: &Path) -> Result<(), CoreError> {
        self.rpc
            .call(
                "backupwallet",
                vec![json!(destination.display().to_string())],
            )
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Wallet, e))?;
        Ok(())
    }

    // ==========================================================================
    // Keys & Signatures
    // ==========================================================================

    /// The private key for `address`, or `None` when the daemon holds no
    /// key for it (code `-4` is "no key available", not an error).
    pub async fn dump_private_key(
        &self,
        address: impl AddressLike,
    ) -> Result<Option<String>, CoreError> {
        let address = address.as_address_str().to_owned();
        match self.rpc.call("dumpprivkey", vec![json!(&address)]).await {
            Ok(raw) => Ok(Some(decode("dumpprivkey", raw)?)),
            Err(CoreError::Rpc(RpcError::ServerError { code: -4, .. })) => Ok(None),
            Err(err) => Err(map_wallet_error(ErrorContext::AddressUse(&address), err)),
        }
    }

    pub async fn import_private_key(
        &self,
        key: &str,
        label: Option<&str>,
    ) -> Result<(), CoreError> {
        let mut params = vec![json!(key)];
        if let Some(label) = label {
            params.push(json!(label));
        }
        self.rpc
            .call("importprivkey", params)
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Wallet, e))?;
        Ok(())
    }

    pub async fn sign_message(
        &self,
        address: impl AddressLike,
        message: &str,
    ) -> Result<String, CoreError> {
        let address = address.as_address_str().to_owned();
        let raw = self
            .rpc
            .call("signmessage", vec![json!(&address), json!(message)])
            .await
            .map_err(|e| map_wallet_error(ErrorContext::MessageSigning(&address), e))?;
        decode("signmessage", raw)
    }

    pub async fn verify_message(
        &self,
        address: impl AddressLike,
        signature: &str,
        message: &str,
    ) -> Result<bool, CoreError> {
        let address = address.as_address_str().to_owned();
        let raw = self
            .rpc
            .call(
                "verifymessage",
                vec![json!(&address), json!(signature), json!(message)],
            )
            .await
            .map_err(|e| map_wallet_error(ErrorContext::AddressUse(&address), e))?;
        decode("verifymessage", raw)
    }

    pub async fn keypool_refill(&self) -> Result<(), CoreError> {
        self.rpc
            .call("keypoolrefill", Vec::new())
            .await
            .map_err(|e| map_wallet_error(ErrorContext::Wallet, e))?;
        Ok(())
    }

    // ==========================================================================
    // Node State
    // ==========================================================================

    pub async fn info(&self) -> Result<NodeInfo, CoreError> {
        let raw = self.rpc.call("getinfo", Vec::new()).await?;
        decode("getinfo", raw)
    }

    pub async fn block_count(&self) -> Result<BlockHeight, CoreError> {
        let raw = self.rpc.call("getblockcount", Vec::new()).await?;
        decode("getblockcount", raw)
    }

    pub async fn connection_count(&self) -> Result<u64, CoreError> {
        let raw = self.rpc.call("getconnectioncount", Vec::new()).await?;
        decode("getconnectioncount", raw)
    }

    pub async fn difficulty(&self) -> Result<f64, CoreError> {
        let raw = self.rpc.call("getdifficulty", Vec::new()).await?;
        decode("getdifficulty", raw)
    }

    pub async fn generating(&self) -> Result<bool, CoreError> {
        let raw = self.rpc.call("getgenerate", Vec::new()).await?;
        decode("getgenerate", raw)
    }

    pub async fn set_generating(
        &self,
        enabled: bool,
        gen_proc_limit: Option<u32>,
    ) -> Result<(), CoreError> {
        let mut params = vec![json!(enabled)];
        if let Some(limit) = gen_proc_limit {
            params.push(json!(limit));
        }
        self.rpc.call("setgenerate", params).await?;
        Ok(())
    }

    pub async fn hashes_per_sec(&self) -> Result<u64, CoreError> {
        let raw = self.rpc.call("gethashespersec", Vec::new()).await?;
        decode("gethashespersec", raw)
    }

    pub async fn set_tx_fee(&self, fee: Amount) -> Result<bool, CoreError> {
        let raw = self
            .rpc
            .call("settxfee", vec![json!(fee.to_btc())])
            .await?;
        decode("settxfee", raw)
    }

    pub async fn memory_pool(&self) -> Result<MemoryPool, CoreError> {
        let raw = self.rpc.call("getmemorypool", Vec::new()).await?;
        decode("getmemorypool", raw)
    }

    pub async fn received_by_address(
        &self,
        minconf: Option<u32>,
        include_empty: bool,
    ) -> Result<Vec<ReceivedByAddress>, CoreError> {
        let raw = self
            .rpc
            .call(
                "listreceivedbyaddress",
                vec![json!(minconf.unwrap_or(1)), json!(include_empty)],
            )
            .await?;
        decode("listreceivedbyaddress", raw)
    }

    pub async fn received_by_account(
        &self,
        minconf: Option<u32>,
        include_empty: bool,
    ) -> Result<Vec<ReceivedByAccount>, CoreError> {
        let raw = self
            .rpc
            .call(
                "listreceivedbyaccount",
                vec![json!(minconf.unwrap_or(1)), json!(include_empty)],
            )
            .await?;
        decode("listreceivedbyaccount", raw)
    }

    /// Ask the daemon to shut down. Returns its farewell message.
    pub async fn stop(&self) -> Result<String, CoreError> {
        let raw = self.rpc.call("stop", Vec::new()).await?;
        decode("stop", raw)
    }
}

fn decode<T: DeserializeOwned>(method: &str, raw: serde_json::Value) -> Result<T, CoreError> {
    serde_json::from_value(raw)
        .map_err(|e| CoreError::InvalidData(format!("invalid {method} result: {e}")))
}

fn ensure_positive(amount: Amount) -> Result<(), CoreError> {
    if amount > Amount::ZERO {
        Ok(())
    } else {
        Err(CoreError::InvalidData(
            "send amount must be positive".to_owned(),
        ))
    }
}

// ==============================================================================
// Tests
// ==============================================================================
