//! Error Module
//!
//! Errors are split by how the pipeline reacts to them:
//! - `LedgerError`: failures talking to the remote ledger
//! - `BuildError`: a single payout cannot be turned into a transaction (skip it)
//! - `PayoutError`: the run cannot continue (abort)

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// 5xx response, retried after the backoff
    #[error("ledger server error {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("ledger request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The request never produced an HTTP status
    #[error("ledger transport error: {0}")]
    Transport(String),

    #[error("malformed ledger response: {0}")]
    Decode(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<LedgerError>,
    },
}

impl LedgerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Server { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid destination {0}")]
    InvalidDestination(String),

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("invalid asset code {0}")]
    InvalidAssetCode(String),

    #[error("fee overflow")]
    FeeOverflow,

    #[error("envelope encoding failed: {0}")]
    Encoding(String),

    /// The sequence counter cannot advance past this transaction
    #[error("sequence number {0} cannot be advanced")]
    SequenceExhausted(i64),
}

impl BuildError {
    /// Fatal build errors abort the whole batch instead of skipping a record
    pub fn is_fatal(&self) -> bool {
        matches!(self, BuildError::SequenceExhausted(_) | BuildError::FeeOverflow)
    }
}

#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("invalid file layout at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    #[error("reference {reference:?} at line {line} is not a 32-byte hex value")]
    InvalidReference { line: usize, reference: String },

    #[error("sequence number is required")]
    MissingSequence,

    #[error("sequence counter exhausted: {0}")]
    SequenceOverflow(BuildError),

    #[error("failed to list known memos: {0}")]
    HistoryQuery(LedgerError),

    #[error("could not check trustline: {0}")]
    EligibilityQuery(LedgerError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PayoutError>;
