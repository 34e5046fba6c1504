//! Stellar Encoding Module
//!
//! This module contains the ledger-specific encodings the builder needs:
//! - Account IDs (strkey) parsing and rendering
//! - Fixed-point amount parsing
//! - Unsigned transaction envelopes, encoded as XDR by `stellar-xdr`

mod amount;
mod strkey;
mod transaction;

pub use amount::{STROOPS_PER_UNIT, parse_amount};
pub use strkey::{AccountId, StrKeyError};
pub use transaction::{Asset, PaymentOp, TimeBounds, Transaction};
