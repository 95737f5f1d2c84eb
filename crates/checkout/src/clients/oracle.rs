use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use nodesale_gateway::HttpGateway;

use crate::collaborators::{PriceOracle, UpstreamError};

/// Spot-rate client. The oracle quotes fiat per one whole coin for a fixed
/// trading pair.
pub struct HttpPriceOracle {
    gateway: Arc<HttpGateway>,
    base_url: String,
    pair: String,
}

#[derive(Deserialize)]
struct RateDto {
    rate: f64,
}

impl HttpPriceOracle {
    pub fn new(
        gateway: Arc<HttpGateway>,
        base_url: impl Into<String>,
        pair: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
            pair: pair.into(),
        }
    }
}

#[async_trait]
impl PriceOracle for HttpPriceOracle {
    async fn rate(&self) -> Result<f64, UpstreamError> {
        let url = format!("{}/rates/{}", self.base_url, self.pair);
        let dto: RateDto = self
            .gateway
            .get_json(&url)
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;
        Ok(dto.rate)
    }
}
