//! This crate provides the typed HTTP transport shared by every collaborator
//! client in the node sale stack: partner catalog, price oracle, wallet
//! daemon, referral and ledger services.
//!
//! ```rust,no_run
//! use nodesale_gateway::{Config, HttpGateway};
//!
//! #[tokio::main]
//! async fn main() -> nodesale_gateway::Result<()> {
//!     let gateway = HttpGateway::new(Config::default())?;
//!
//!     let rate: serde_json::Value = gateway
//!         .get_json("http://127.0.0.1:8080/rates/COIN-USD")
//!         .await?;
//!     println!("Spot rate: {}", rate);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use config::{Config, DEFAULT_TIMEOUT_SECS};
pub use error::{GatewayError, Result};
pub use http::HttpGateway;

pub fn default_gateway() -> Result<HttpGateway> {
    HttpGateway::new(Config::default())
}
