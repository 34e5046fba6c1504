//! Batch Module
//!
//! This module turns payout records into transaction envelopes:
//! - TransactionBuilder: builds one unsigned transaction per payout
//! - BatchPipeline: deduplicates, checks eligibility and sequences the batch

mod builder;
pub mod orchestrator;


pub use builder::{BuiltTransaction, TransactionBuilder};
pub use orchestrator::{BatchPipeline, BatchSummary, Processed};
