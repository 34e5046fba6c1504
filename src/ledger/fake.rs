//! In-memory ledger for tests
//!
//! Serves a fixed payment history in pages, a set of accounts, and lets
//! tests queue errors that are returned before the real answer.

use super::Ledger;
use crate::error::LedgerError;
use crate::types::{AccountDetail, Balance, PaymentRecord, PaymentsPage, TransactionInfo};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeLedger {
    payments: Vec<PaymentRecord>,
    accounts: HashMap<String, AccountDetail>,
    payment_errors: Mutex<VecDeque<LedgerError>>,
    account_errors: Mutex<VecDeque<LedgerError>>,
    /// Cursors received by `list_payments`, in call order
    pub cursors: Mutex<Vec<Option<String>>>,
    pub payment_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payment to the history
    pub fn with_payment(self, from: &str, memo_type: &str, memo: Option<&[u8]>) -> Self {
        self.with_encoded_memo(from, memo_type, memo.map(|m| BASE64.encode(m)))
    }

    /// Append a payment whose memo is served exactly as given
    pub fn with_encoded_memo(mut self, from: &str, memo_type: &str, memo: Option<String>) -> Self {
        let token = format!("{}", self.payments.len() + 1);
        self.payments.push(PaymentRecord {
            paging_token: token,
            kind: "payment".to_string(),
            from: Some(from.to_string()),
            transaction: Some(TransactionInfo {
                memo_type: memo_type.to_string(),
                memo,
            }),
        });
        self
    }

    /// Append a non-payment operation (e.g. `create_account`) to the history
    pub fn with_operation(mut self, kind: &str, from: &str, memo: &[u8]) -> Self {
        self.payments.push(PaymentRecord {
            paging_token: format!("{}", self.payments.len() + 1),
            kind: kind.to_string(),
            from: Some(from.to_string()),
            transaction: Some(TransactionInfo {
                memo_type: "hash".to_string(),
                memo: Some(BASE64.encode(memo)),
            }),
        });
        self
    }

    /// Register an account holding the given (code, issuer) balance lines
    pub fn with_account(mut self, account: &str, lines: &[(&str, &str)]) -> Self {
        let mut balances = vec![Balance {
            balance: "10.0000000".to_string(),
            asset_type: "native".to_string(),
            asset_code: None,
            asset_issuer: None,
        }];
        for (code, issuer) in lines {
            balances.push(Balance {
                balance: "0.0000000".to_string(),
                asset_type: "credit_alphanum4".to_string(),
                asset_code: Some(code.to_string()),
                asset_issuer: Some(issuer.to_string()),
            });
        }
        self.accounts
            .insert(account.to_string(), AccountDetail { balances });
        self
    }

    pub fn fail_payments(self, error: LedgerError) -> Self {
        self.payment_errors.lock().unwrap().push_back(error);
        self
    }

    pub fn fail_accounts(self, error: LedgerError) -> Self {
        self.account_errors.lock().unwrap().push_back(error);
        self
    }

    pub fn payment_calls(&self) -> usize {
        self.payment_calls.load(Ordering::SeqCst)
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn list_payments(
        &self,
        _account: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<PaymentsPage, LedgerError> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        self.cursors
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));
        if let Some(error) = self.payment_errors.lock().unwrap().pop_front() {
            return Err(error);
        }

        let start = match cursor {
            Some(token) => self
                .payments
                .iter()
                .position(|p| p.paging_token == token)
                .map_or(self.payments.len(), |i| i + 1),
            None => 0,
        };
        let records = self
            .payments
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(PaymentsPage { records })
    }

    async fn get_account(&self, account: &str) -> Result<AccountDetail, LedgerError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.account_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.accounts
            .get(account)
            .cloned()
            .ok_or_else(|| LedgerError::Status {
                status: 404,
                detail: "Resource Missing".to_string(),
            })
    }
}
