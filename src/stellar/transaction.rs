//! Transaction model and envelope encoding
//!
//! Payout transactions are kept in a small model of their own and converted
//! to the ledger's XDR types only when the envelope is produced. Every
//! envelope is a v1 `TransactionEnvelope` with a hash memo, time-bound
//! preconditions, payment operations and no signatures.

use super::strkey::AccountId;
use crate::error::BuildError;
use crate::types::Reference;
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

/// Issued (non-native) asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    AlphaNum4 { code: [u8; 4], issuer: AccountId },
    AlphaNum12 { code: [u8; 12], issuer: AccountId },
}

impl Asset {
    /// Build a credit asset from its code: 1-4 alphanumerics encode as
    /// AlphaNum4, 5-12 as AlphaNum12
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self, BuildError> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BuildError::InvalidAssetCode(code.to_string()));
        }
        match code.len() {
            1..=4 => {
                let mut padded = [0u8; 4];
                padded[..code.len()].copy_from_slice(code.as_bytes());
                Ok(Asset::AlphaNum4 { code: padded, issuer })
            }
            5..=12 => {
                let mut padded = [0u8; 12];
                padded[..code.len()].copy_from_slice(code.as_bytes());
                Ok(Asset::AlphaNum12 { code: padded, issuer })
            }
            _ => Err(BuildError::InvalidAssetCode(code.to_string())),
        }
    }

    pub fn issuer(&self) -> &AccountId {
        match self {
            Asset::AlphaNum4 { issuer, .. } | Asset::AlphaNum12 { issuer, .. } => issuer,
        }
    }

    pub fn code(&self) -> String {
        let raw: &[u8] = match self {
            Asset::AlphaNum4 { code, .. } => code,
            Asset::AlphaNum12 { code, .. } => code,
        };
        raw.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }

    fn to_xdr_asset(&self) -> xdr::Asset {
        match self {
            Asset::AlphaNum4 { code, issuer } => xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
                asset_code: xdr::AssetCode4(*code),
                issuer: issuer.to_xdr_account_id(),
            }),
            Asset::AlphaNum12 { code, issuer } => xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
                asset_code: xdr::AssetCode12(*code),
                issuer: issuer.to_xdr_account_id(),
            }),
        }
    }
}

/// Payment of an issued asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOp {
    /// Operation-level source; `None` inherits the transaction source
    pub source: Option<AccountId>,
    pub destination: AccountId,
    pub asset: Asset,
    /// Stroops
    pub amount: i64,
}

impl PaymentOp {
    fn to_operation(&self) -> xdr::Operation {
        xdr::Operation {
            source_account: self.source.as_ref().map(AccountId::to_muxed_account),
            body: xdr::OperationBody::Payment(xdr::PaymentOp {
                destination: self.destination.to_muxed_account(),
                asset: self.asset.to_xdr_asset(),
                amount: self.amount,
            }),
        }
    }
}

/// Validity window in unix seconds. A `max_time` of zero means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    /// Window open from now until `secs` seconds after `now`
    pub fn timeout(now: u64, secs: u64) -> Self {
        Self {
            min_time: 0,
            max_time: now.saturating_add(secs),
        }
    }
}

/// Unsigned transaction with a hash memo and time-bound preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub source: AccountId,
    pub fee: u32,
    pub sequence: i64,
    pub time_bounds: TimeBounds,
    pub memo: Reference,
    pub operations: Vec<PaymentOp>,
}

impl Transaction {
    /// The unsigned v1 envelope
    pub fn envelope(&self) -> Result<xdr::TransactionEnvelope, BuildError> {
        let operations: xdr::VecM<xdr::Operation, 100> = self
            .operations
            .iter()
            .map(PaymentOp::to_operation)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|e: xdr::Error| BuildError::Encoding(e.to_string()))?;

        let tx = xdr::Transaction {
            source_account: self.source.to_muxed_account(),
            fee: self.fee,
            seq_num: xdr::SequenceNumber(self.sequence),
            cond: xdr::Preconditions::Time(xdr::TimeBounds {
                min_time: xdr::TimePoint(self.time_bounds.min_time),
                max_time: xdr::TimePoint(self.time_bounds.max_time),
            }),
            memo: xdr::Memo::Hash(xdr::Hash(*self.memo.as_bytes())),
            operations,
            ext: xdr::TransactionExt::V0,
        };

        Ok(xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx,
            signatures: xdr::VecM::default(),
        }))
    }

    /// Base64 XDR of the envelope, the text form handed to the signer
    pub fn envelope_base64(&self) -> Result<String, BuildError> {
        self.envelope()?
            .to_xdr_base64(Limits::none())
            .map_err(|e| BuildError::Encoding(e.to_string()))
    }
}
