//! Ledger Integration Module
//!
//! This module handles the read-only queries made against the ledger network:
//! - Payment history of the issuing account (for deduplication)
//! - Account balances of destinations (for trustline checks)
//!
//! Nothing here submits transactions.

mod horizon;
mod retry;

#[cfg(test)]
pub(crate) mod fake;

pub use horizon::HorizonClient;
pub use retry::RetryPolicy;

use crate::error::LedgerError;
use crate::types::{AccountDetail, PaymentsPage};
use async_trait::async_trait;

/// Read-only view of the ledger
///
/// Both calls fail with `LedgerError::Server` for transient server errors,
/// which callers retry through a `RetryPolicy`.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// List payments involving `account`, oldest first, starting after `cursor`
    async fn list_payments(
        &self,
        account: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<PaymentsPage, LedgerError>;

    /// Fetch the current state of `account`
    async fn get_account(&self, account: &str) -> Result<AccountDetail, LedgerError>;
}
