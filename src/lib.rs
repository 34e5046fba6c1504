//! This crate turns a list of payout instructions into unsigned, ready-to-sign
//! ledger transactions. Payouts already present in the issuer's history are
//! skipped, destinations can be checked for a trustline, and sequence
//! numbers are assigned in input order.

pub mod types; // Payout records, outcomes and ledger response types.
pub mod error; // Error taxonomy: ledger, per-record and fatal errors.
pub mod config; // Defines and loads configuration.
pub mod input; // Reads the payout list and opens the envelope output.
pub mod stellar; // Account IDs, amounts and XDR envelope encoding.
pub mod ledger; // Read-only access to the ledger (Horizon).
pub mod history; // Index of references already paid out.
pub mod eligibility; // Trustline checks on destinations.
pub mod batch; // Transaction building and the batch pipeline.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use batch::BatchPipeline;
