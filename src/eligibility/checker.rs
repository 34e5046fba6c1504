use super::cache::EligibilityCache;
use crate::error::LedgerError;
use crate::ledger::{Ledger, RetryPolicy};
use crate::stellar::Asset;
use crate::types::AccountDetail;
use std::sync::Arc;
use tracing::{debug, error};

/// Decides whether a destination can receive the payout asset
///
/// Selected once at startup and never switched during a run.
pub enum EligibilityChecker {
    /// Every destination is eligible; used when trustlines were verified
    /// out of band
    Disabled,
    /// Destination must hold a balance line for the asset
    Trustline(TrustlineChecker),
}

impl EligibilityChecker {
    /// Check whether `account` may receive the asset
    ///
    /// # Returns
    /// * `Ok(true)` if the account is eligible
    /// * `Ok(false)` if it is not, or if the ledger refused the lookup
    /// * `Err` on transport failures or exhausted retries
    pub async fn check(&mut self, account: &str) -> Result<bool, LedgerError> {
        match self {
            EligibilityChecker::Disabled => Ok(true),
            EligibilityChecker::Trustline(checker) => checker.check(account).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EligibilityChecker::Disabled => "disabled",
            EligibilityChecker::Trustline(_) => "trustline",
        }
    }
}

/// Ledger-backed trustline check with a per-run cache
pub struct TrustlineChecker {
    ledger: Arc<dyn Ledger>,
    asset_code: String,
    asset_issuer: String,
    retry: RetryPolicy,
    cache: EligibilityCache,
}

impl TrustlineChecker {
    pub fn new(ledger: Arc<dyn Ledger>, asset: &Asset, retry: RetryPolicy) -> Self {
        Self {
            ledger,
            asset_code: asset.code(),
            asset_issuer: asset.issuer().to_string(),
            retry,
            cache: EligibilityCache::new(),
        }
    }

    pub async fn check(&mut self, account: &str) -> Result<bool, LedgerError> {
        if let Some(eligible) = self.cache.get(account) {
            debug!("Trustline of {} answered from cache", account);
            return Ok(eligible);
        }

        let ledger = &self.ledger;
        let detail = match self
            .retry
            .run("account lookup", || ledger.get_account(account))
            .await
        {
            Ok(detail) => detail,
            // HTTP errors (e.g. unknown account) are masked as ineligible
            Err(LedgerError::Status { status, detail }) => {
                error!("Checking account {} failed: {} {}", account, status, detail);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let eligible = self.holds_asset(&detail);
        if eligible {
            self.cache.record(account, true);
        }
        Ok(eligible)
    }

    fn holds_asset(&self, detail: &AccountDetail) -> bool {
        detail.balances.iter().any(|balance| {
            balance.asset_code.as_deref() == Some(self.asset_code.as_str())
                && balance.asset_issuer.as_deref() == Some(self.asset_issuer.as_str())
        })
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
