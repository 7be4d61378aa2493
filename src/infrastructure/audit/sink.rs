//! Delivery of audit records to a remote collector.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::record::AuditRecord;

/// Errors that can occur while delivering a record.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("audit sink rejected record with status {0}")]
    Rejected(u16),
}

/// Acknowledgement returned by the collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(rename = "logID")]
    pub log_id: Option<String>,
}

/// Destination for audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn deliver(&self, record: &AuditRecord) -> Result<DeliveryReceipt, AuditError>;
}

/// Posts each record as JSON to a collector endpoint.
pub struct HttpAuditSink {
    client: Client,
    endpoint: String,
}

impl HttpAuditSink {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn deliver(&self, record: &AuditRecord) -> Result<DeliveryReceipt, AuditError> {
        let response = self.client.post(&self.endpoint).json(record).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Rejected(status.as_u16()));
        }

        // Collectors that answer without a JSON body still count as delivered.
        Ok(response.json().await.unwrap_or_default())
    }
}
