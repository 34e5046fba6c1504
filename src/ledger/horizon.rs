use super::Ledger;
use crate::error::LedgerError;
use crate::types::{AccountDetail, PaymentRecord, PaymentsPage};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HAL collection wrapper used by Horizon list endpoints
#[derive(Debug, Deserialize)]
struct HalPage<T> {
    #[serde(rename = "_embedded")]
    embedded: Embedded<T>,
}

#[derive(Debug, Deserialize)]
struct Embedded<T> {
    records: Vec<T>,
}

/// Horizon error body (RFC 7807 problem document)
#[derive(Debug, Default, Deserialize)]
struct Problem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl Problem {
    fn describe(self) -> String {
        match (self.title, self.detail) {
            (Some(title), Some(detail)) => format!("{}: {}", title, detail),
            (Some(text), None) | (None, Some(text)) => text,
            (None, None) => "no details".to_string(),
        }
    }
}

/// Horizon REST client
pub struct HorizonClient {
    base_url: String,
    client: Client,
}

impl HorizonClient {
    /// Creates a client for the Horizon server at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - e.g. "https://horizon.stellar.org"
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, LedgerError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<Problem>()
                .await
                .unwrap_or_default()
                .describe();
            if status.is_server_error() {
                return Err(LedgerError::Server {
                    status: status.as_u16(),
                    detail,
                });
            }
            return Err(LedgerError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Ledger for HorizonClient {
    async fn list_payments(
        &self,
        account: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<PaymentsPage, LedgerError> {
        let url = format!("{}/accounts/{}/payments", self.base_url, account);
        let mut query = vec![
            ("limit", limit.to_string()),
            ("order", "asc".to_string()),
            ("join", "transactions".to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let page: HalPage<PaymentRecord> = self.get_json(&url, &query).await?;
        Ok(PaymentsPage {
            records: page.embedded.records,
        })
    }

    async fn get_account(&self, account: &str) -> Result<AccountDetail, LedgerError> {
        let url = format!("{}/accounts/{}", self.base_url, account);
        self.get_json(&url, &[]).await
    }
}
