use crate::error::LedgerError;
use crate::ledger::{Ledger, RetryPolicy};
use crate::types::{PaymentRecord, Reference};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::collections::HashSet;
use tracing::{debug, info};

/// All payout payments carry a hash memo
const PAYOUT_MEMO_TYPE: &str = "hash";

/// References already used by the issuing account, as lowercase hex
///
/// Built once per run and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct HistorySet {
    references: HashSet<String>,
}

impl HistorySet {
    pub fn contains(&self, reference: &Reference) -> bool {
        self.references.contains(&reference.to_hex())
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl FromIterator<String> for HistorySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            references: iter.into_iter().map(|r| r.to_lowercase()).collect(),
        }
    }
}

/// Build the history index for `account`
///
/// Pages through the account's payments oldest first. Only outgoing
/// `payment` operations with a hash memo count as payouts; their memo is
/// decoded from base64 and stored as hex.
///
/// # Arguments
/// * `ledger` - Ledger to query
/// * `account` - Issuing account
/// * `page_limit` - Records requested per page
/// * `retry` - Retry policy for transient server errors
///
/// # Returns
/// * `Ok(HistorySet)` once the history is exhausted
/// * `Err(LedgerError)` on any non-retryable failure or a malformed memo
pub async fn build_history_index(
    ledger: &dyn Ledger,
    account: &str,
    page_limit: u32,
    retry: &RetryPolicy,
) -> Result<HistorySet, LedgerError> {
    let mut references = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page_cursor = cursor.as_deref();
        let page = retry
            .run("payment history request", || {
                ledger.list_payments(account, page_cursor, page_limit)
            })
            .await?;
        pages += 1;

        let Some(last) = page.records.last() else {
            break;
        };
        let next_cursor = last.paging_token.clone();

        for record in &page.records {
            if let Some(reference) = payout_reference(record, account)? {
                references.insert(reference);
            }
        }
        debug!(
            "History page {}: {} records, {} references so far",
            pages,
            page.records.len(),
            references.len()
        );

        if page.records.len() < page_limit as usize {
            break;
        }
        cursor = Some(next_cursor);
    }

    info!(
        "Found {} previous payout references in {} pages",
        references.len(),
        pages
    );
    Ok(HistorySet { references })
}

/// Hex reference of an outgoing hash-memo payment, `None` for anything else
fn payout_reference(record: &PaymentRecord, account: &str) -> Result<Option<String>, LedgerError> {
    if record.kind != "payment" || record.from.as_deref() != Some(account) {
        return Ok(None);
    }
    let Some(tx) = &record.transaction else {
        return Ok(None);
    };
    if tx.memo_type != PAYOUT_MEMO_TYPE {
        return Ok(None);
    }
    let memo = tx.memo.as_deref().unwrap_or_default();
    let raw = BASE64.decode(memo).map_err(|e| {
        LedgerError::Decode(format!(
            "memo {:?} of payment {} is not base64: {}",
            memo, record.paging_token, e
        ))
    })?;
    Ok(Some(hex::encode(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fake::FakeLedger;
    use std::time::Duration;

    const ISSUER: &str = "GISSUER";
    const OTHER: &str = "GOTHER";

    fn retry() -> RetryPolicy {
        RetryPolicy::new(Duration::ZERO, None)
    }

    fn reference(byte: u8) -> Reference {
        Reference::from_bytes([byte; 32])
    }

    #[tokio::test]
    async fn test_collects_outgoing_hash_memos() {
        let ledger = FakeLedger::new()
            .with_payment(ISSUER, "hash", Some(&[1u8; 32]))
            .with_payment(OTHER, "hash", Some(&[2u8; 32]))
            .with_payment(ISSUER, "text", Some(b"hello"))
            .with_payment(ISSUER, "none", None)
            .with_operation("create_account", ISSUER, &[3u8; 32])
            .with_payment(ISSUER, "hash", Some(&[4u8; 32]));

        let history = build_history_index(&ledger, ISSUER, 200, &retry())
            .await
            .unwrap();

        assert_eq!(history.len(), 2);
        assert!(history.contains(&reference(1)));
        assert!(history.contains(&reference(4)));
        // incoming payment
        assert!(!history.contains(&reference(2)));
        // not a payment operation
        assert!(!history.contains(&reference(3)));
    }

    #[tokio::test]
    async fn test_paginates_with_cursor() {
        let mut ledger = FakeLedger::new();
        for i in 0..5u8 {
            ledger = ledger.with_payment(ISSUER, "hash", Some(&[i; 32]));
        }

        let history = build_history_index(&ledger, ISSUER, 2, &retry())
            .await
            .unwrap();

        assert_eq!(history.len(), 5);
        // pages of 2, 2, then a short page of 1 ends the scan
        assert_eq!(ledger.payment_calls(), 3);
        let cursors = ledger.cursors.lock().unwrap().clone();
        assert_eq!(
            cursors,
            vec![None, Some("2".to_string()), Some("4".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let mut ledger = FakeLedger::new();
        for i in 0..4u8 {
            ledger = ledger.with_payment(ISSUER, "hash", Some(&[i; 32]));
        }

        let history = build_history_index(&ledger, ISSUER, 2, &retry())
            .await
            .unwrap();

        assert_eq!(history.len(), 4);
        // two full pages, then an empty one
        assert_eq!(ledger.payment_calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let ledger = FakeLedger::new();
        let history = build_history_index(&ledger, ISSUER, 200, &retry())
            .await
            .unwrap();
        assert!(history.is_empty());
        assert_eq!(ledger.payment_calls(), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let ledger = FakeLedger::new()
            .with_payment(ISSUER, "hash", Some(&[9u8; 32]))
            .fail_payments(LedgerError::Server {
                status: 500,
                detail: "boom".to_string(),
            })
            .fail_payments(LedgerError::Server {
                status: 503,
                detail: "busy".to_string(),
            });

        let history = build_history_index(&ledger, ISSUER, 200, &retry())
            .await
            .unwrap();

        assert!(history.contains(&reference(9)));
        assert_eq!(ledger.payment_calls(), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_fatal() {
        let ledger = FakeLedger::new().fail_payments(LedgerError::Status {
            status: 400,
            detail: "bad request".to_string(),
        });

        let result = build_history_index(&ledger, ISSUER, 200, &retry()).await;
        assert!(matches!(result, Err(LedgerError::Status { status: 400, .. })));
        assert_eq!(ledger.payment_calls(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_memo_is_fatal() {
        let ledger = FakeLedger::new()
            .with_payment(ISSUER, "hash", Some(&[1u8; 32]))
            .with_encoded_memo(ISSUER, "hash", Some("!!notbase64".to_string()));

        let result = build_history_index(&ledger, ISSUER, 200, &retry()).await;
        match result {
            Err(LedgerError::Decode(detail)) => assert!(detail.contains("!!notbase64")),
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_memo_of_other_sender_is_ignored() {
        let ledger = FakeLedger::new()
            .with_encoded_memo(OTHER, "hash", Some("!!notbase64".to_string()))
            .with_payment(ISSUER, "hash", Some(&[1u8; 32]));

        let history = build_history_index(&ledger, ISSUER, 200, &retry())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_from_iter_normalizes_case() {
        let history: HistorySet = ["ABAB".repeat(16)].into_iter().collect();
        assert!(history.contains(&Reference::from_bytes([0xab; 32])));
    }
}
