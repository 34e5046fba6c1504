//! Destination Eligibility Module
//!
//! This module decides whether a destination account can receive the payout
//! asset. On the ledger that means the account has opened a trustline to
//! the asset, i.e. holds a balance line for its code and issuer.

mod cache;
mod checker;

pub use cache::EligibilityCache;
pub use checker::{EligibilityChecker, TrustlineChecker};
