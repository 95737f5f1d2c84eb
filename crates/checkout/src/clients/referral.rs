use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use nodesale_gateway::HttpGateway;

use crate::collaborators::{ReferralService, UpstreamError};

/// Client for the referral backend that mints a shareable code for every
/// completed purchase.
pub struct HttpReferralService {
    gateway: Arc<HttpGateway>,
    base_url: String,
}

#[derive(Serialize)]
struct IssueRequest<'a> {
    wallet_address: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
struct IssueResponse {
    referral_code: String,
}

impl HttpReferralService {
    pub fn new(gateway: Arc<HttpGateway>, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ReferralService for HttpReferralService {
    async fn issue(&self, wallet_address: &str, email: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/referrals", self.base_url);
        let response: IssueResponse = self
            .gateway
            .post_json(
                &url,
                &IssueRequest {
                    wallet_address,
                    email,
                },
            )
            .await
            .map_err(|e| UpstreamError(e.to_string()))?;
        Ok(response.referral_code)
    }
}
