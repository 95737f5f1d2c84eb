use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use nodesale_gateway::{GatewayError, HttpGateway};

use crate::collaborators::{PartnerCatalog, UpstreamError};
use crate::partner::PartnerPricing;

/// Catalog client over the partner REST API. The active partner is pinned
/// at construction; the hosting surface resolves it from its own context
/// (referral landing page, subdomain, campaign link).
pub struct HttpPartnerCatalog {
    gateway: Arc<HttpGateway>,
    base_url: String,
    active_partner: Option<String>,
}

#[derive(Deserialize)]
struct PartnerDto {
    unit_price_fiat: f64,
    payments_wallet: String,
    available_capacity: u64,
}

impl HttpPartnerCatalog {
    pub fn new(
        gateway: Arc<HttpGateway>,
        base_url: impl Into<String>,
        active_partner: Option<String>,
    ) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
            active_partner,
        }
    }
}

#[async_trait]
impl PartnerCatalog for HttpPartnerCatalog {
    fn active_partner(&self) -> Option<String> {
        self.active_partner.clone()
    }

    async fn lookup(&self, partner_id: &str) -> Result<Option<PartnerPricing>, UpstreamError> {
        let url = format!("{}/partners/{}", self.base_url, partner_id);
        debug!("Partner lookup: {}", url);

        match self.gateway.get_json::<PartnerDto>(&url).await {
            Ok(dto) => Ok(Some(PartnerPricing {
                unit_price_fiat: dto.unit_price_fiat,
                payments_wallet: dto.payments_wallet,
                available_capacity: dto.available_capacity,
            })),
            // 404 is an answer, not a failure: the catalog does not know
            // this partner.
            Err(GatewayError::Status { code: 404, .. }) => Ok(None),
            Err(e) => Err(UpstreamError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_payload_decodes() {
        let dto: PartnerDto = serde_json::from_str(
            r#"{"unit_price_fiat": 5.0, "payments_wallet": "0xabc", "available_capacity": 120}"#,
        )
        .unwrap();
        assert_eq!(dto.unit_price_fiat, 5.0);
        assert_eq!(dto.available_capacity, 120);
    }
}
