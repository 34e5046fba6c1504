//! Batch Pipeline Module
//!
//! This module connects the history index, the eligibility checker and the
//! transaction builder. Records are processed strictly in input order, one
//! at a time, and each ends in exactly one terminal state.
//!
//! # Per-record Flow
//! 1. Skip if the reference was already paid (ledger history) or already
//!    emitted earlier in this batch
//! 2. Skip if the destination is not eligible for the asset
//! 3. Build the transaction; skip if the payment is structurally invalid
//! 4. Write the envelope and advance the sequence counter

use crate::{
    batch::builder::{BuiltTransaction, TransactionBuilder},
    eligibility::EligibilityChecker,
    error::{PayoutError, Result},
    history::HistorySet,
    PayoutRecord, RecordOutcome, Reference, SkipReason,
};
use std::collections::HashSet;
use std::io::Write;
use tracing::{info, warn};

/// Result of processing a single record
#[derive(Debug)]
pub enum Processed {
    Emitted(BuiltTransaction),
    Skipped(SkipReason),
}

/// Totals of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// One entry per input record, in input order
    pub outcomes: Vec<RecordOutcome>,
    pub emitted: usize,
    pub duplicates: usize,
    pub ineligible: usize,
    pub invalid: usize,
    /// First sequence number not used by this run
    pub next_sequence: i64,
}

impl BatchSummary {
    fn record(&mut self, outcome: RecordOutcome) {
        match &outcome {
            RecordOutcome::Emitted { .. } => self.emitted += 1,
            RecordOutcome::Skipped(SkipReason::AlreadyPaid)
            | RecordOutcome::Skipped(SkipReason::RepeatedInBatch) => self.duplicates += 1,
            RecordOutcome::Skipped(SkipReason::NoTrustline) => self.ineligible += 1,
            RecordOutcome::Skipped(SkipReason::Invalid(_)) => self.invalid += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn skipped(&self) -> usize {
        self.duplicates + self.ineligible + self.invalid
    }
}

/// Payout batch pipeline
///
/// Owns the per-run state: the history index, the eligibility checker (and
/// its cache) and the set of references emitted so far. The sequence
/// counter is passed in and returned explicitly.
pub struct BatchPipeline {
    history: HistorySet,
    eligibility: EligibilityChecker,
    builder: TransactionBuilder,
    /// References emitted during this run
    emitted: HashSet<Reference>,
}

impl BatchPipeline {
    /// Creates a new pipeline
    ///
    /// # Arguments
    /// * `history` - References already paid by the issuer
    /// * `eligibility` - Destination check selected for this run
    /// * `builder` - Transaction builder for the configured asset
    pub fn new(
        history: HistorySet,
        eligibility: EligibilityChecker,
        builder: TransactionBuilder,
    ) -> Self {
        Self {
            history,
            eligibility,
            builder,
            emitted: HashSet::new(),
        }
    }

    /// Process one record with the given sequence number
    ///
    /// Checks run in a fixed order: duplicate, eligibility, construction.
    /// Skips are logged and returned; only fatal errors are `Err`.
    pub async fn process_record(
        &mut self,
        record: &PayoutRecord,
        sequence: i64,
    ) -> Result<Processed> {
        if self.history.contains(&record.reference) {
            return Ok(self.skip(record, SkipReason::AlreadyPaid));
        }
        if self.emitted.contains(&record.reference) {
            return Ok(self.skip(record, SkipReason::RepeatedInBatch));
        }

        let eligible = self
            .eligibility
            .check(&record.destination)
            .await
            .map_err(PayoutError::EligibilityQuery)?;
        if !eligible {
            return Ok(self.skip(record, SkipReason::NoTrustline));
        }

        let built = match self.builder.build(record, sequence) {
            Ok(built) => built,
            Err(e) if e.is_fatal() => return Err(PayoutError::SequenceOverflow(e)),
            Err(e) => return Ok(self.skip(record, SkipReason::Invalid(e.to_string()))),
        };

        info!(
            "Sending {} to {} with memo {} (sequence {})",
            record.amount, record.destination, record.reference, sequence
        );
        self.emitted.insert(record.reference);
        Ok(Processed::Emitted(built))
    }

    fn skip(&self, record: &PayoutRecord, reason: SkipReason) -> Processed {
        warn!(
            "Payment of {} to {} with memo {} skipped: {}",
            record.amount, record.destination, record.reference, reason
        );
        Processed::Skipped(reason)
    }

    /// Run the whole batch, writing one envelope line per emitted record
    ///
    /// # Arguments
    /// * `records` - Payout records in input order
    /// * `start_sequence` - Sequence number of the first emitted transaction
    /// * `out` - Destination of the envelope lines
    ///
    /// # Returns
    /// * `Ok(BatchSummary)` once every record reached a terminal state
    /// * `Err(PayoutError)` on the first fatal error; lines already written
    ///   stay written
    pub async fn run<W: Write>(
        &mut self,
        records: &[PayoutRecord],
        start_sequence: i64,
        out: &mut W,
    ) -> Result<BatchSummary> {
        info!(
            "Processing {} records starting at sequence {} (eligibility: {})",
            records.len(),
            start_sequence,
            self.eligibility.name()
        );

        let mut summary = BatchSummary {
            next_sequence: start_sequence,
            ..BatchSummary::default()
        };

        for record in records {
            match self.process_record(record, summary.next_sequence).await? {
                Processed::Emitted(built) => {
                    writeln!(out, "{}", built.envelope)?;
                    summary.record(RecordOutcome::Emitted {
                        sequence: built.transaction.sequence,
                    });
                    summary.next_sequence = built.next_sequence;
                }
                Processed::Skipped(reason) => summary.record(RecordOutcome::Skipped(reason)),
            }
        }
        out.flush()?;

        info!(
            "Batch complete: {} emitted, {} duplicates, {} ineligible, {} invalid, next sequence {}",
            summary.emitted,
            summary.duplicates,
            summary.ineligible,
            summary.invalid,
            summary.next_sequence
        );
        Ok(summary)
    }
}
