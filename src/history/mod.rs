//! Payout History Module
//!
//! This module builds the set of references the issuing account has already
//! paid out, by scanning its payment history on the ledger. A payout whose
//! reference is in this set must not be built again.

mod index;
pub use index::{HistorySet, build_history_index};
