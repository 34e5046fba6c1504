use serde::Deserialize;
use std::fmt;

/// 32-byte payout reference, carried on-chain as a hash memo
///
/// The reference is the idempotency key of a payout: two payments with the
/// same reference are the same payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference([u8; 32]);

impl Reference {
    /// Decode a reference from its hex form (exactly 64 hex characters)
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex form, as used for history comparisons
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One payout instruction from the input batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutRecord {
    pub destination: String,
    pub amount: String,
    pub reference: Reference,
}

/// Payment operation as returned by the ledger's payments endpoint
///
/// Only the fields the history index needs are decoded. `transaction` is
/// present when the request joined transactions.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRecord {
    pub paging_token: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub transaction: Option<TransactionInfo>,
}

/// Memo fields of the transaction a payment belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    pub memo_type: String,
    /// Base64 for hash memos
    #[serde(default)]
    pub memo: Option<String>,
}

/// One page of payment history, in request order
#[derive(Debug, Clone, Default)]
pub struct PaymentsPage {
    pub records: Vec<PaymentRecord>,
}

/// Account state as returned by the ledger
#[derive(Debug, Clone, Deserialize)]
pub struct AccountDetail {
    #[serde(default)]
    pub balances: Vec<Balance>,
}

/// Balance line of an account. Native balances carry no code or issuer.
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub balance: String,
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
}

/// Why a record produced no envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Reference already present in the issuer's ledger history
    AlreadyPaid,
    /// Reference already emitted earlier in this batch
    RepeatedInBatch,
    /// Destination does not hold a balance line for the asset
    NoTrustline,
    /// Payment failed structural validation
    Invalid(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyPaid => write!(f, "payment already happened"),
            SkipReason::RepeatedInBatch => write!(f, "reference already emitted in this batch"),
            SkipReason::NoTrustline => write!(f, "destination has no trustline for the asset"),
            SkipReason::Invalid(reason) => write!(f, "invalid payment: {}", reason),
        }
    }
}

/// Terminal state of a processed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Emitted { sequence: i64 },
    Skipped(SkipReason),
}
