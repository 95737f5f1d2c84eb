use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use nodesale_gateway::HttpGateway;

use crate::collaborators::{ChainWatch, WalletError, WalletGateway};

/// EIP-1193 code for a signature request the user declined.
const CODE_USER_REJECTED: i64 = 4001;

/// JSON-RPC client for the wallet daemon that holds the buyer's smart
/// account. Key management and transaction assembly stay on the daemon
/// side; this client only asks it to send one value transfer.
pub struct RpcWalletGateway {
    gateway: Arc<HttpGateway>,
    rpc_url: String,
    address: String,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    fn new(method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        }
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize, Debug)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcWalletGateway {
    pub fn new(
        gateway: Arc<HttpGateway>,
        rpc_url: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            rpc_url: rpc_url.into(),
            address: address.into(),
        }
    }
}

/// Map the daemon's error body onto the wallet failure shape. Anything not
/// recognizably a funds or rejection problem stays generic.
fn classify(error: RpcErrorBody) -> WalletError {
    if error.code == CODE_USER_REJECTED {
        return WalletError::Rejected;
    }
    if error.message.to_ascii_lowercase().contains("insufficient funds") {
        return WalletError::InsufficientFunds;
    }
    WalletError::Other(format!("wallet error {}: {}", error.code, error.message))
}

/// Transaction hashes come back as 0x-prefixed 32-byte hex.
fn validate_tx_hash(hash: &str) -> Result<(), WalletError> {
    let malformed = || WalletError::Other(format!("malformed transaction hash {:?}", hash));
    let hex_part = hash.strip_prefix("0x").ok_or_else(malformed)?;
    if hex_part.len() != 64 || hex::decode(hex_part).is_err() {
        return Err(malformed());
    }
    Ok(())
}

#[async_trait]
impl WalletGateway for RpcWalletGateway {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn submit(&self, to: &str, base_units: u128) -> Result<String, WalletError> {
        let request = RpcRequest::new(
            "wallet_sendTransfer",
            json!({
                "from": self.address,
                "to": to,
                "value": format!("{:#x}", base_units),
            }),
        );

        info!("Submitting transfer of {} base units to {}", base_units, to);
        let response: RpcResponse = self
            .gateway
            .post_json(&self.rpc_url, &request)
            .await
            .map_err(|e| WalletError::Other(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(classify(error));
        }

        let hash = response
            .result
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| WalletError::Other("wallet returned no transaction hash".into()))?;
        validate_tx_hash(&hash)?;

        Ok(hash)
    }
}

#[async_trait]
impl ChainWatch for RpcWalletGateway {
    /// The required chain is configured as the expected `eth_chainId` reply
    /// (hex chain id). Any transport failure counts as "wrong network".
    async fn on_required_chain(&self, chain: &str) -> bool {
        let request = RpcRequest::new("eth_chainId", json!([]));
        let response: RpcResponse = match self.gateway.post_json(&self.rpc_url, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Chain check failed: {}", e);
                return false;
            }
        };

        match response.result.and_then(|v| v.as_str().map(str::to_string)) {
            Some(id) => id.eq_ignore_ascii_case(chain),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_code_classified() {
        let err = classify(RpcErrorBody {
            code: CODE_USER_REJECTED,
            message: "User rejected the request.".into(),
        });
        assert!(matches!(err, WalletError::Rejected));
    }

    #[test]
    fn test_insufficient_funds_message_classified() {
        let err = classify(RpcErrorBody {
            code: -32000,
            message: "Insufficient funds for gas * price + value".into(),
        });
        assert!(matches!(err, WalletError::InsufficientFunds));
    }

    #[test]
    fn test_unrecognized_error_stays_generic() {
        let err = classify(RpcErrorBody {
            code: -32603,
            message: "execution reverted".into(),
        });
        assert!(matches!(err, WalletError::Other(_)));
    }

    #[test]
    fn test_tx_hash_validation() {
        let good = format!("0x{}", "ab".repeat(32));
        assert!(validate_tx_hash(&good).is_ok());

        assert!(validate_tx_hash("ab").is_err());
        assert!(validate_tx_hash(&"ab".repeat(32)).is_err()); // missing 0x
        assert!(validate_tx_hash(&format!("0x{}", "ab".repeat(31))).is_err());
        assert!(validate_tx_hash(&format!("0x{}", "zz".repeat(32))).is_err());
    }
}
