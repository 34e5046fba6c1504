use std::collections::HashMap;

/// Per-run memo of destination eligibility
///
/// Append-only: entries are never invalidated during a run. Only positive
/// answers are recorded by the checker, so an ineligible account is asked
/// again the next time it appears.
#[derive(Debug, Default)]
pub struct EligibilityCache {
    accounts: HashMap<String, bool>,
}

impl EligibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, account: &str) -> Option<bool> {
        self.accounts.get(account).copied()
    }

    pub fn record(&mut self, account: &str, eligible: bool) {
        self.accounts.insert(account.to_string(), eligible);
    }

    pub(crate) fn len(&self) -> usize {
        self.accounts.len()
    }
}
