/// Seams for every external service the workflow consumes. Production
/// implementations live in `clients`; tests script these directly.
use async_trait::async_trait;
use thiserror::Error;

use crate::partner::PartnerPricing;
use crate::purchase::PurchaseRecord;

/// Opaque failure from a backend collaborator. The workflow decides which
/// failure kind it maps to; the detail is only ever logged.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct UpstreamError(pub String);

/// Failure shape reported by the wallet for a submission.
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("insufficient on-chain funds")]
    InsufficientFunds,
    #[error("signature request rejected")]
    Rejected,
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait PartnerCatalog: Send + Sync {
    /// The partner whose allocation this purchase draws from, if any.
    fn active_partner(&self) -> Option<String>;

    /// Pricing and remaining allocation; `None` when the partner is unknown
    /// to the catalog.
    async fn lookup(&self, partner_id: &str) -> Result<Option<PartnerPricing>, UpstreamError>;
}

#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fiat units per one whole coin.
    async fn rate(&self) -> Result<f64, UpstreamError>;
}

#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Address of the connected account.
    fn address(&self) -> String;

    /// Submit a single value transfer and return its transaction id.
    async fn submit(&self, to: &str, base_units: u128) -> Result<String, WalletError>;
}

#[async_trait]
pub trait ChainWatch: Send + Sync {
    /// Whether the connected wallet is currently on `chain`.
    async fn on_required_chain(&self, chain: &str) -> bool;
}

#[async_trait]
pub trait ReferralService: Send + Sync {
    /// Issue a fresh referral code for a completed purchase.
    async fn issue(&self, wallet_address: &str, email: &str) -> Result<String, UpstreamError>;
}

#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Record a completed purchase. `Ok(false)` means the backend answered
    /// but declined to record.
    async fn record(&self, record: &PurchaseRecord) -> Result<bool, UpstreamError>;
}

/// "Do not navigate away" signal to the hosting surface while a wallet call
/// is outstanding.
pub trait NavigationSentinel: Send + Sync {
    fn hold(&self);
    fn release(&self);
}

/// Sentinel for hosts with nothing to pin.
pub struct NoopSentinel;

impl NavigationSentinel for NoopSentinel {
    fn hold(&self) {}
    fn release(&self) {}
}
