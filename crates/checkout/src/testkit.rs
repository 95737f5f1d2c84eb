//! Scripted collaborators for exercising the purchase workflow without a
//! network. Compiled for this crate's own tests and, behind the
//! `test-utils` feature, for downstream consumers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::collaborators::{
    ChainWatch, NavigationSentinel, PartnerCatalog, PriceOracle, PurchaseLedger, ReferralService,
    UpstreamError, WalletError, WalletGateway,
};
use crate::partner::PartnerPricing;
use crate::purchase::{PurchaseForm, PurchaseRecord};
use crate::session::{MemorySessionStore, EMAIL_KEY};
use crate::workflow::{Collaborators, PurchaseWorkflow, WorkflowConfig};

pub const PARTNER_ID: &str = "atlas-validators";
pub const PAYMENTS_WALLET: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
pub const BUYER_ADDRESS: &str = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f";
pub const BUYER_EMAIL: &str = "buyer@example.com";
pub const TX_HASH: &str = "0x9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
pub const ISSUED_CODE: &str = "NEWLY-MINTED-1";

pub struct StaticCatalog {
    partner: Option<String>,
    pricing: Option<PartnerPricing>,
    fail_lookup: bool,
    pub lookups: AtomicUsize,
}

impl StaticCatalog {
    pub fn new(pricing: PartnerPricing) -> Self {
        Self {
            partner: Some(PARTNER_ID.to_string()),
            pricing: Some(pricing),
            fail_lookup: false,
            lookups: AtomicUsize::new(0),
        }
    }

    /// No partner resolved from the hosting context.
    pub fn without_partner() -> Self {
        Self {
            partner: None,
            pricing: None,
            fail_lookup: false,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Partner resolved, but the catalog does not know it.
    pub fn unknown_partner() -> Self {
        Self {
            partner: Some(PARTNER_ID.to_string()),
            pricing: None,
            fail_lookup: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            partner: Some(PARTNER_ID.to_string()),
            pricing: None,
            fail_lookup: true,
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PartnerCatalog for StaticCatalog {
    fn active_partner(&self) -> Option<String> {
        self.partner.clone()
    }

    async fn lookup(&self, _partner_id: &str) -> Result<Option<PartnerPricing>, UpstreamError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(UpstreamError("catalog is down".into()));
        }
        Ok(self.pricing.clone())
    }
}

pub struct StaticOracle {
    rate: f64,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StaticOracle {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            rate: 0.0,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PriceOracle for StaticOracle {
    async fn rate(&self) -> Result<f64, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpstreamError("oracle is down".into()));
        }
        Ok(self.rate)
    }
}

enum SubmitScript {
    Succeed,
    OutOfFunds,
    Reject,
    Fail(String),
}

pub struct ScriptedWallet {
    script: SubmitScript,
    pub submissions: AtomicUsize,
    last_transfer: Mutex<Option<(String, u128)>>,
}

impl ScriptedWallet {
    fn with_script(script: SubmitScript) -> Self {
        Self {
            script,
            submissions: AtomicUsize::new(0),
            last_transfer: Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_script(SubmitScript::Succeed)
    }

    pub fn out_of_funds() -> Self {
        Self::with_script(SubmitScript::OutOfFunds)
    }

    pub fn rejecting() -> Self {
        Self::with_script(SubmitScript::Reject)
    }

    pub fn failing(detail: &str) -> Self {
        Self::with_script(SubmitScript::Fail(detail.to_string()))
    }

    /// Destination and amount of the most recent submission.
    pub fn last_transfer(&self) -> Option<(String, u128)> {
        self.last_transfer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WalletGateway for ScriptedWallet {
    fn address(&self) -> String {
        BUYER_ADDRESS.to_string()
    }

    async fn submit(&self, to: &str, base_units: u128) -> Result<String, WalletError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        *self
            .last_transfer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((to.to_string(), base_units));

        match &self.script {
            SubmitScript::Succeed => Ok(TX_HASH.to_string()),
            SubmitScript::OutOfFunds => Err(WalletError::InsufficientFunds),
            SubmitScript::Reject => Err(WalletError::Rejected),
            SubmitScript::Fail(detail) => Err(WalletError::Other(detail.clone())),
        }
    }
}

pub struct StaticChain {
    on_required: bool,
    pub checks: AtomicUsize,
}

impl StaticChain {
    pub fn connected() -> Self {
        Self {
            on_required: true,
            checks: AtomicUsize::new(0),
        }
    }

    pub fn wrong_network() -> Self {
        Self {
            on_required: false,
            checks: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChainWatch for StaticChain {
    async fn on_required_chain(&self, _chain: &str) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.on_required
    }
}

pub struct StaticReferrals {
    code: String,
    fail: bool,
    pub issued: AtomicUsize,
}

impl StaticReferrals {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            fail: false,
            issued: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            code: String::new(),
            fail: true,
            issued: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReferralService for StaticReferrals {
    async fn issue(&self, _wallet_address: &str, _email: &str) -> Result<String, UpstreamError> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpstreamError("referral service is down".into()));
        }
        Ok(self.code.clone())
    }
}

pub struct RecordingLedger {
    accept: bool,
    fail: bool,
    records: Mutex<Vec<PurchaseRecord>>,
}

impl RecordingLedger {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            fail: false,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            accept: false,
            fail: false,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            accept: false,
            fail: true,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<PurchaseRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PurchaseLedger for RecordingLedger {
    async fn record(&self, record: &PurchaseRecord) -> Result<bool, UpstreamError> {
        if self.fail {
            return Err(UpstreamError("ledger is down".into()));
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(self.accept)
    }
}

#[derive(Default)]
pub struct CountingSentinel {
    pub holds: AtomicUsize,
    pub releases: AtomicUsize,
}

impl CountingSentinel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NavigationSentinel for CountingSentinel {
    fn hold(&self) {
        self.holds.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collaborator set primed for a clean first purchase: a partner with
/// plenty of allocation, a live oracle, a wallet that settles and backends
/// that accept. Swap individual fields to script a failure.
pub struct Harness {
    pub catalog: Arc<StaticCatalog>,
    pub oracle: Arc<StaticOracle>,
    pub wallet: Arc<ScriptedWallet>,
    pub chain: Arc<StaticChain>,
    pub referrals: Arc<StaticReferrals>,
    pub ledger: Arc<RecordingLedger>,
    pub session: Arc<MemorySessionStore>,
    pub sentinel: Arc<CountingSentinel>,
}

impl Harness {
    pub fn new() -> Self {
        let session = Arc::new(MemorySessionStore::new());
        session.put(EMAIL_KEY, BUYER_EMAIL);

        Self {
            catalog: Arc::new(StaticCatalog::new(PartnerPricing {
                unit_price_fiat: 5.0,
                payments_wallet: PAYMENTS_WALLET.to_string(),
                available_capacity: 500,
            })),
            oracle: Arc::new(StaticOracle::new(2000.0)),
            wallet: Arc::new(ScriptedWallet::succeeding()),
            chain: Arc::new(StaticChain::connected()),
            referrals: Arc::new(StaticReferrals::new(ISSUED_CODE)),
            ledger: Arc::new(RecordingLedger::accepting()),
            session,
            sentinel: Arc::new(CountingSentinel::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            catalog: self.catalog.clone(),
            oracle: self.oracle.clone(),
            wallet: self.wallet.clone(),
            chain: self.chain.clone(),
            referrals: self.referrals.clone(),
            ledger: self.ledger.clone(),
            session: self.session.clone(),
            sentinel: self.sentinel.clone(),
        }
    }

    pub fn workflow(&self) -> PurchaseWorkflow {
        PurchaseWorkflow::new(WorkflowConfig::default(), self.collaborators())
    }

    pub fn form(quantity: &str) -> PurchaseForm {
        PurchaseForm {
            referral_code: "FRIEND-42".to_string(),
            quantity: quantity.to_string(),
            bonus_plan: "0".to_string(),
            diagnostics: false,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
