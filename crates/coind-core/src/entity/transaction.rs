use std::collections::HashMap;

use bitcoin::{SignedAmount, Txid};

use crate::error::CoreError;
use crate::rpc::types::RawWalletTx;
use crate::types::AddressLike;

/// A wallet transaction, folded from a `gettransaction` `details` array.
///
/// `amounts` maps every touched address to its net signed amount (positive
/// means received, negative means sent); `fees` maps the sending addresses
/// to the fee they paid, so its key set is a subset of `amounts`'. Only
/// transactions touching an address whose private key the daemon holds are
/// visible at all.
#[derive(Debug, Clone)]
pub struct Transaction {
    txid: Txid,
    time: Option<u64>,
    amounts: HashMap<String, SignedAmount>,
    fees: HashMap<String, SignedAmount>,
}

impl Transaction {
    pub(crate) fn from_raw(raw: RawWalletTx) -> Result<Self, CoreError> {
        let mut amounts: HashMap<String, SignedAmount> = HashMap::new();
        let mut fees: HashMap<String, SignedAmount> = HashMap::new();

        for detail in raw.details {
            // Entries without an address (e.g. internal moves) carry no
            // per-address accounting.
            let Some(address) = detail.address else {
                continue;
            };

            let entry = amounts.entry(address.clone()).or_insert(SignedAmount::ZERO);
            *entry = entry.checked_add(detail.amount).ok_or_else(|| {
                CoreError::InvalidData(format!("amount overflow folding details of {}", raw.txid))
            })?;

            if let Some(fee) = detail.fee {
                let entry = fees.entry(address).or_insert(SignedAmount::ZERO);
                *entry = entry.checked_add(fee).ok_or_else(|| {
                    CoreError::InvalidData(format!("fee overflow folding details of {}", raw.txid))
                })?;
            }
        }

        Ok(Self {
            txid: raw.txid,
            time: raw.time,
            amounts,
            fees,
        })
    }

    pub fn txid(&self) -> Txid {
        self.txid
    }

    /// Reported timestamp, unix seconds. Absent for some unconfirmed
    /// transactions.
    pub fn time(&self) -> Option<u64> {
        self.time
    }

    /// Net amount per touched address.
    pub fn amounts(&self) -> &HashMap<String, SignedAmount> {
        &self.amounts
    }

    /// Fee paid per sending address.
    pub fn fees(&self) -> &HashMap<String, SignedAmount> {
        &self.fees
    }

    pub fn amount_for(&self, address: impl AddressLike) -> Option<SignedAmount> {
        self.amounts.get(address.as_address_str()).copied()
    }

    pub fn fee_for(&self, address: impl AddressLike) -> Option<SignedAmount> {
        self.fees.get(address.as_address_str()).copied()
    }

    /// Whether this transaction touches the given address, by amount or fee.
    pub fn involves(&self, address: impl AddressLike) -> bool {
        let addr = address.as_address_str();
        self.amounts.contains_key(addr) || self.fees.contains_key(addr)
    }
}
