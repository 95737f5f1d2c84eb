/// Orchestrates the purchase flow: validate → price → submit → record
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::collaborators::{
    ChainWatch, NavigationSentinel, PartnerCatalog, PriceOracle, PurchaseLedger, ReferralService,
    WalletError, WalletGateway,
};
use crate::error::{CheckoutError, FailureKind, Result};
use crate::partner;
use crate::pricing::{self, Quote};
use crate::purchase::{PurchaseForm, PurchaseOutcome, PurchaseRecord, PurchaseRequest};
use crate::receipt;
use crate::session::{SessionStore, EMAIL_KEY};

#[derive(Clone, Debug)]
pub struct WorkflowConfig {
    /// Chain id the connected wallet must report, in `eth_chainId` form.
    pub required_chain: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            required_chain: "0x1".to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn with_required_chain(mut self, chain: &str) -> Self {
        self.required_chain = chain.to_string();
        self
    }
}

/// Every external service one attempt touches.
pub struct Collaborators {
    pub catalog: Arc<dyn PartnerCatalog>,
    pub oracle: Arc<dyn PriceOracle>,
    pub wallet: Arc<dyn WalletGateway>,
    pub chain: Arc<dyn ChainWatch>,
    pub referrals: Arc<dyn ReferralService>,
    pub ledger: Arc<dyn PurchaseLedger>,
    pub session: Arc<dyn SessionStore>,
    pub sentinel: Arc<dyn NavigationSentinel>,
}

/// Lifecycle of the current attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptPhase {
    Idle,
    Validating,
    Converting,
    Submitting,
    Recording,
    Done,
    Failed(FailureKind),
}

impl AttemptPhase {
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            AttemptPhase::Validating
                | AttemptPhase::Converting
                | AttemptPhase::Submitting
                | AttemptPhase::Recording
        )
    }
}

#[derive(Debug)]
struct WorkflowState {
    phase: AttemptPhase,
    last_error: Option<String>,
}

/// Holds the navigation sentinel while a wallet call is outstanding;
/// released on drop, whichever way the call ends.
struct SentinelHold<'a> {
    sentinel: &'a dyn NavigationSentinel,
}

impl<'a> SentinelHold<'a> {
    fn new(sentinel: &'a dyn NavigationSentinel) -> Self {
        sentinel.hold();
        Self { sentinel }
    }
}

impl Drop for SentinelHold<'_> {
    fn drop(&mut self) {
        self.sentinel.release();
    }
}

pub struct PurchaseWorkflow {
    config: WorkflowConfig,
    collaborators: Collaborators,
    state: Mutex<WorkflowState>,
}

impl PurchaseWorkflow {
    pub fn new(config: WorkflowConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            state: Mutex::new(WorkflowState {
                phase: AttemptPhase::Idle,
                last_error: None,
            }),
        }
    }

    /// Whether an attempt is between start and a terminal state.
    pub fn in_progress(&self) -> bool {
        self.lock_state().phase.is_in_progress()
    }

    /// User-facing message of the most recent failure. Cleared when the
    /// next attempt starts.
    pub fn current_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    pub fn phase(&self) -> AttemptPhase {
        self.lock_state().phase
    }

    /// Run one purchase attempt end to end. Calling this while another
    /// attempt is in flight fails fast with `Busy` and leaves the running
    /// attempt untouched.
    pub async fn execute(&self, form: PurchaseForm) -> Result<PurchaseOutcome> {
        self.begin_attempt()?;
        let diagnostics = form.diagnostics;

        match self.run_attempt(form).await {
            Ok(outcome) => {
                if let Some(warning) = &outcome.warning {
                    self.log_detail(diagnostics, warning);
                    warn!(
                        "Purchase {} completed with warning: {}",
                        outcome.transaction_id, warning
                    );
                }
                self.finish(AttemptPhase::Done, None);
                Ok(outcome)
            }
            Err(err) => {
                self.log_detail(diagnostics, &err);
                self.finish(AttemptPhase::Failed(err.kind()), Some(err.to_string()));
                Err(err)
            }
        }
    }

    async fn run_attempt(&self, form: PurchaseForm) -> Result<PurchaseOutcome> {
        // 1. Schema validation; no collaborator is consulted for a form
        //    that does not parse
        let request = form.validate()?;
        info!(
            "Purchase attempt: {} unit(s), bonus plan {}",
            request.quantity, request.bonus_plan
        );

        // 2. Partner resolution and capacity
        let partner_id = self
            .collaborators
            .catalog
            .active_partner()
            .ok_or(CheckoutError::NoPartnerContext)?;
        let pricing = self
            .collaborators
            .catalog
            .lookup(&partner_id)
            .await
            .map_err(|e| CheckoutError::PartnerLookupFailed {
                detail: e.to_string(),
            })?
            .ok_or_else(|| CheckoutError::PartnerLookupFailed {
                detail: format!("partner {} is not in the catalog", partner_id),
            })?;

        let bonus = partner::bonus_units(request.quantity);
        let required = partner::units_required(request.quantity);
        if required > pricing.available_capacity {
            return Err(CheckoutError::InsufficientCapacity {
                requested: required,
                available: pricing.available_capacity,
            });
        }
        info!(
            "Partner {}: {} unit(s) + {} bonus against {} available",
            partner_id, request.quantity, bonus, pricing.available_capacity
        );

        // 3. Stored identity
        let email = self
            .collaborators
            .session
            .get(EMAIL_KEY)
            .ok_or(CheckoutError::MissingStoredIdentity)?;

        // 4. Network check
        if !self
            .collaborators
            .chain
            .on_required_chain(&self.config.required_chain)
            .await
        {
            return Err(CheckoutError::WrongNetwork {
                required: self.config.required_chain.clone(),
            });
        }

        // 5. Price conversion
        self.set_phase(AttemptPhase::Converting);
        let rate = self
            .collaborators
            .oracle
            .rate()
            .await
            .map_err(|e| CheckoutError::ConversionFailed {
                detail: e.to_string(),
            })?;
        let quote = pricing::quote(pricing.unit_price_fiat, request.quantity, rate)?;
        info!(
            "Quoted {} fiat / {} coin / {} base units at rate {}",
            quote.fiat_total, quote.crypto_total, quote.base_units, rate
        );

        // 6. Submission, with the sentinel held for exactly as long as the
        //    wallet call is outstanding
        self.set_phase(AttemptPhase::Submitting);
        let transaction_id = {
            let _hold = SentinelHold::new(self.collaborators.sentinel.as_ref());
            self.collaborators
                .wallet
                .submit(&pricing.payments_wallet, quote.base_units)
                .await
                .map_err(|e| match e {
                    WalletError::InsufficientFunds => CheckoutError::InsufficientFunds,
                    WalletError::Rejected => CheckoutError::UserRejected,
                    WalletError::Other(detail) => CheckoutError::SubmissionFailed { detail },
                })?
        };
        info!("Transfer settled: {}", transaction_id);

        // 7. Post-submission recording; the transfer is settled, so nothing
        //    past this point may fail the attempt
        self.set_phase(AttemptPhase::Recording);
        let warning = self
            .record_purchase(&request, &partner_id, &quote, &transaction_id, &email)
            .await;

        // 8. Opaque token for the result screen
        let receipt = receipt::seal(&transaction_id, &email);

        Ok(PurchaseOutcome {
            transaction_id,
            success: true,
            warning,
            receipt,
        })
    }

    /// Referral issue plus exactly one ledger record. Failures here degrade
    /// to a `RecordingFailed` warning on the outcome instead of failing the
    /// attempt.
    async fn record_purchase(
        &self,
        request: &PurchaseRequest,
        partner_id: &str,
        quote: &Quote,
        transaction_id: &str,
        email: &str,
    ) -> Option<CheckoutError> {
        let wallet_address = self.collaborators.wallet.address();
        let mut warning = None;

        let issued_referral_code = match self
            .collaborators
            .referrals
            .issue(&wallet_address, email)
            .await
        {
            Ok(code) => code,
            Err(e) => {
                warn!("Referral issuance failed after settled transfer");
                warning = Some(CheckoutError::RecordingFailed {
                    detail: format!("referral issuance failed: {}", e),
                });
                String::new()
            }
        };

        let record = PurchaseRecord {
            partner_id: partner_id.to_string(),
            transaction_id: transaction_id.to_string(),
            fiat_total: quote.fiat_total,
            crypto_total: quote.crypto_total,
            quantity: request.quantity,
            bonus_plan: request.bonus_plan,
            wallet_address,
            email: email.to_string(),
            issued_referral_code,
            supplied_referral_code: request.referral_code.clone(),
        };

        match self.collaborators.ledger.record(&record).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Purchase ledger declined the record");
                warning = Some(CheckoutError::RecordingFailed {
                    detail: "ledger declined the record".into(),
                });
            }
            Err(e) => {
                warn!("Purchase ledger unreachable after settled transfer");
                warning = Some(CheckoutError::RecordingFailed {
                    detail: format!("ledger unreachable: {}", e),
                });
            }
        }

        warning
    }

    /// Raw collaborator detail reaches the log only when the attempt asked
    /// for diagnostics.
    fn log_detail(&self, diagnostics: bool, err: &CheckoutError) {
        if !diagnostics {
            return;
        }
        if let Some(detail) = err.detail() {
            warn!("Collaborator detail for {:?}: {}", err.kind(), detail);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_attempt(&self) -> Result<()> {
        let mut state = self.lock_state();
        if state.phase.is_in_progress() {
            return Err(CheckoutError::Busy);
        }
        state.phase = AttemptPhase::Validating;
        state.last_error = None;
        Ok(())
    }

    fn set_phase(&self, phase: AttemptPhase) {
        self.lock_state().phase = phase;
    }

    fn finish(&self, phase: AttemptPhase, error: Option<String>) {
        let mut state = self.lock_state();
        state.phase = phase;
        state.last_error = error;
    }
}
