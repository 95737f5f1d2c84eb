use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nodesale_checkout::clients::{
    HttpPartnerCatalog, HttpPriceOracle, HttpPurchaseLedger, HttpReferralService, RpcWalletGateway,
};
use nodesale_checkout::collaborators::NavigationSentinel;
use nodesale_checkout::session::{MemorySessionStore, EMAIL_KEY};
use nodesale_checkout::{Collaborators, PurchaseForm, PurchaseWorkflow, WorkflowConfig};
use nodesale_gateway::{Config as GatewayConfig, HttpGateway};

mod config;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "nodesale")]
#[command(about = "Buy partner-allocated node units with a crypto wallet")]
struct Args {
    /// Referral code from the person who invited you
    #[arg(long)]
    referral_code: String,

    /// Number of units to buy
    #[arg(long)]
    quantity: String,

    /// Bonus plan selector
    #[arg(long, default_value = "0")]
    bonus_plan: String,

    /// Log raw collaborator errors for this attempt
    #[arg(long)]
    diagnostics: bool,

    /// Print the outcome as JSON instead of the human summary
    #[arg(long)]
    json: bool,
}

/// Prints the "do not close" notice while the wallet call is outstanding.
struct TerminalSentinel;

impl NavigationSentinel for TerminalSentinel {
    fn hold(&self) {
        println!(
            "{}",
            "Do not close this window while the transfer settles...".yellow()
        );
    }

    fn release(&self) {}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nodesale=info,nodesale_checkout=info,nodesale_gateway=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();
    let config = CliConfig::from_env()?;

    let mut gateway_config = GatewayConfig::default().with_timeout(config.http_timeout_secs);
    if let Some(proxy) = &config.proxy {
        gateway_config = gateway_config.with_proxy(proxy);
    }
    let gateway = Arc::new(HttpGateway::new(gateway_config)?);

    let wallet = Arc::new(RpcWalletGateway::new(
        gateway.clone(),
        config.wallet_rpc_url.clone(),
        config.wallet_address.clone(),
    ));

    let session = Arc::new(MemorySessionStore::new());
    if let Some(email) = &config.email {
        session.put(EMAIL_KEY, email);
    }

    let collaborators = Collaborators {
        catalog: Arc::new(HttpPartnerCatalog::new(
            gateway.clone(),
            config.backend_url.clone(),
            config.partner_id.clone(),
        )),
        oracle: Arc::new(HttpPriceOracle::new(
            gateway.clone(),
            config.oracle_url.clone(),
            config.rate_pair.clone(),
        )),
        wallet: wallet.clone(),
        // The wallet daemon also answers the chain check
        chain: wallet,
        referrals: Arc::new(HttpReferralService::new(
            gateway.clone(),
            config.backend_url.clone(),
        )),
        ledger: Arc::new(HttpPurchaseLedger::new(gateway, config.backend_url.clone())),
        session,
        sentinel: Arc::new(TerminalSentinel),
    };

    let workflow = PurchaseWorkflow::new(
        WorkflowConfig::default().with_required_chain(&config.required_chain),
        collaborators,
    );

    println!();
    println!(
        "  Partner:  {}",
        config.partner_id.as_deref().unwrap_or("(none)")
    );
    println!("  Quantity: {}", args.quantity);
    println!("  Chain:    {}", config.required_chain);
    println!("  Started:  {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    info!("Submitting purchase through {}", config.backend_url);

    let form = PurchaseForm {
        referral_code: args.referral_code,
        quantity: args.quantity,
        bonus_plan: args.bonus_plan,
        diagnostics: args.diagnostics,
    };

    match workflow.execute(form).await {
        Ok(outcome) => {
            if args.json {
                let warning = outcome.warning.as_ref().map(|w| w.to_string());
                println!(
                    "{}",
                    serde_json::json!({
                        "success": outcome.success,
                        "transaction_id": outcome.transaction_id,
                        "receipt": outcome.receipt,
                        "warning": warning,
                    })
                );
            } else {
                println!("{}", "PURCHASE COMPLETE".green().bold());
                println!("  Transaction: {}", outcome.transaction_id);
                println!("  Receipt:     {}", outcome.receipt);
                if let Some(warning) = &outcome.warning {
                    println!("  {} {}", "Warning:".yellow(), warning);
                }
            }
            Ok(())
        }
        Err(err) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": false,
                        "error": err.to_string(),
                    })
                );
            } else {
                println!("{}", "PURCHASE FAILED".red().bold());
                println!("  {}", err);
            }
            std::process::exit(1);
        }
    }
}
