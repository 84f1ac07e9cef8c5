//! Error taxonomy for the wallet client.
//!
//! [`RpcError`] covers the transport layer (connection, deadline, framing,
//! and daemon-reported JSON-RPC errors). [`CoreError`] is the domain
//! taxonomy callers match on. Daemon error codes are reused across
//! operations, so [`map_wallet_error`] resolves a raw server error into a
//! domain error per call site via [`ErrorContext`].

use bitcoin::{Amount, BlockHash, Txid};

use crate::types::BlockHeight;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The call exceeded the transport deadline.
    #[error("rpc call timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    /// A structured error reported by the daemon.
    #[error("daemon error {code}: {message}")]
    ServerError { code: i64, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A transport or unmapped daemon error, passed through unmodified.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The daemon holds no private key for this address. Same shape as
    /// [`CoreError::InvalidAddress`], stricter meaning.
    #[error("no private key for address: {0}")]
    UnknownPrivateKey(String),

    #[error("block not found: {0}")]
    UnknownBlock(BlockHash),

    #[error("transaction not found: {0}")]
    UnknownTransaction(Txid),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },

    #[error("wallet is locked")]
    LockedWallet,

    /// Carries the attempted passphrase for caller inspection; the display
    /// form never echoes it.
    #[error("incorrect wallet passphrase")]
    InvalidPassphrase(String),

    #[error("block height out of range: {0}")]
    BlockHeightOutOfRange(BlockHeight),

    /// Malformed daemon payload or invalid caller-supplied argument.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

// ==============================================================================
// Code → Domain Error Mapping
// ==============================================================================

/// The high-level operation a failed RPC call was serving. Daemon codes are
/// reused across operations (`-5` means "unknown" for blocks, transactions,
/// and addresses alike), so the context disambiguates.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ErrorContext<'a> {
    BlockLookup(&'a BlockHash),
    BlockByHeight(BlockHeight),
    TransactionLookup(&'a Txid),
    AddressUse(&'a str),
    MessageSigning(&'a str),
    Passphrase(&'a str),
    /// Wallet-state operations where only the locked-wallet code applies.
    Wallet,
}

/// Resolve a daemon-reported error into a domain error for the given call
/// context. Anything without a known `(code, context)` mapping is returned
/// unmodified. Code `-6` (insufficient funds) is not handled here: the
/// client enriches it with the current balance at the call site, and `-4`
/// on a private-key dump is "no key available", not an error.
pub(crate) fn map_wallet_error(ctx: ErrorContext<'_>, err: CoreError) -> CoreError {
    let code = match &err {
        CoreError::Rpc(RpcError::ServerError { code, .. }) => *code,
        _ => return err,
    };

    match (code, ctx) {
        (-13, _) => CoreError::LockedWallet,
        (-5, ErrorContext::BlockLookup(hash)) => CoreError::UnknownBlock(*hash),
        (-5, ErrorContext::TransactionLookup(txid)) => CoreError::UnknownTransaction(*txid),
        (-5, ErrorContext::AddressUse(addr)) | (-5, ErrorContext::MessageSigning(addr)) => {
            CoreError::InvalidAddress(addr.to_owned())
        }
        (-4, ErrorContext::MessageSigning(addr)) => CoreError::UnknownPrivateKey(addr.to_owned()),
        (-14, ErrorContext::Passphrase(attempted)) => {
            CoreError::InvalidPassphrase(attempted.to_owned())
        }
        (-1, ErrorContext::BlockByHeight(height)) => CoreError::BlockHeightOutOfRange(height),
        _ => err,
    }
}
