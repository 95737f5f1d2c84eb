//! Production collaborators over the gateway transport: partner catalog,
//! price oracle, wallet daemon, referral and ledger services.

pub mod catalog;
pub mod ledger;
pub mod oracle;
pub mod referral;
pub mod wallet;

pub use catalog::HttpPartnerCatalog;
pub use ledger::HttpPurchaseLedger;
pub use oracle::HttpPriceOracle;
pub use referral::HttpReferralService;
pub use wallet::RpcWalletGateway;
