use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use nodesale_gateway::HttpGateway;

use crate::collaborators::{PurchaseLedger, UpstreamError};
use crate::purchase::PurchaseRecord;

/// Client for the backend purchase ledger. The workflow posts exactly one
/// record per settled transfer; the backend owns dedup and persistence.
pub struct HttpPurchaseLedger {
    gateway: Arc<HttpGateway>,
    base_url: String,
}

#[derive(Deserialize)]
struct RecordResponse {
    recorded: bool,
}

impl HttpPurchaseLedger {
    pub fn new(gateway: Arc<HttpGateway>, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PurchaseLedger for HttpPurchaseLedger {
    async fn record(&self, record: &PurchaseRecord) -> Result<bool, UpstreamError> {
        let url = format!("{}/purchases", self.base_url);
        let response: RecordResponse = self
            .gateway
            .post_json(&url, record)
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;
        Ok(response.recorded)
    }
}
