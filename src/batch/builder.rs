//! Transaction Builder Module
//!
//! This module turns one payout record into one unsigned transaction
//! envelope. The source account, asset, fee and validity window are fixed
//! for the whole run; only the destination, amount, memo and sequence number
//! change between transactions.

use crate::config::Config;
use crate::error::{BuildError, PayoutError};
use crate::stellar::{AccountId, Asset, PaymentOp, TimeBounds, Transaction, parse_amount};
use crate::types::PayoutRecord;
use std::time::Duration;

/// Transaction built for one record
#[derive(Debug, Clone)]
pub struct BuiltTransaction {
    pub transaction: Transaction,
    /// Base64 XDR of the unsigned envelope
    pub envelope: String,
    /// Sequence number to use for the following record
    pub next_sequence: i64,
}

/// Payment transaction builder
///
/// Builds payments of a single issued asset, sent by its issuer.
pub struct TransactionBuilder {
    /// Issuing account: transaction source and payment source
    source: AccountId,
    asset: Asset,
    /// Fee per operation, in stroops
    base_fee: u32,
    validity: Duration,
}

impl TransactionBuilder {
    /// Creates a builder from the run configuration
    ///
    /// # Arguments
    /// * `config` - Asset and transaction parameters
    ///
    /// # Returns
    /// `PayoutError::Config` if the issuer or asset code is malformed
    pub fn new(config: &Config) -> Result<Self, PayoutError> {
        let asset = config.asset()?;
        Ok(Self {
            source: *asset.issuer(),
            asset,
            base_fee: config.transaction.base_fee,
            validity: Duration::from_secs(config.transaction.validity_secs),
        })
    }

    /// Build the transaction for `record` with sequence number `sequence`
    ///
    /// The validity window starts now.
    ///
    /// # Returns
    /// * `Ok(BuiltTransaction)` with the envelope and the next sequence number
    /// * `Err(BuildError)` if the payment is structurally invalid; see
    ///   `BuildError::is_fatal` for the errors that must abort the batch
    pub fn build(&self, record: &PayoutRecord, sequence: i64) -> Result<BuiltTransaction, BuildError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.build_at(record, sequence, now)
    }

    /// Same as `build`, with an explicit construction time (unix seconds)
    pub fn build_at(
        &self,
        record: &PayoutRecord,
        sequence: i64,
        now: u64,
    ) -> Result<BuiltTransaction, BuildError> {
        let payment = self.payment(record)?;

        let operations = vec![payment];
        let fee = u32::try_from(operations.len())
            .ok()
            .and_then(|count| self.base_fee.checked_mul(count))
            .ok_or(BuildError::FeeOverflow)?;
        let next_sequence = sequence
            .checked_add(1)
            .ok_or(BuildError::SequenceExhausted(sequence))?;

        let transaction = Transaction {
            source: self.source,
            fee,
            sequence,
            time_bounds: TimeBounds::timeout(now, self.validity.as_secs()),
            memo: record.reference,
            operations,
        };
        let envelope = transaction.envelope_base64()?;

        Ok(BuiltTransaction {
            transaction,
            envelope,
            next_sequence,
        })
    }

    /// Validate and assemble the payment operation
    fn payment(&self, record: &PayoutRecord) -> Result<PaymentOp, BuildError> {
        let destination: AccountId = record
            .destination
            .parse()
            .map_err(|e| BuildError::InvalidDestination(format!("{}: {}", record.destination, e)))?;
        let amount = parse_amount(&record.amount).map_err(|reason| BuildError::InvalidAmount {
            amount: record.amount.clone(),
            reason,
        })?;

        Ok(PaymentOp {
            source: Some(self.source),
            destination,
            asset: self.asset.clone(),
            amount,
        })
    }

    pub fn source(&self) -> &AccountId {
        &self.source
    }
}
