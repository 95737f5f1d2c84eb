/// Purchase DTOs: the raw form, its validated shape, the ledger record and
/// the outcome handed back to the presentation layer.
use serde::{Deserialize, Serialize};

use crate::error::{CheckoutError, Result};

/// A submission exactly as the presentation layer captured it. Nothing in it
/// is trusted until `validate` parses it into a `PurchaseRequest`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseForm {
    pub referral_code: String,
    pub quantity: String,
    pub bonus_plan: String,
    /// Log raw collaborator errors for this attempt.
    #[serde(default)]
    pub diagnostics: bool,
}

/// A schema-validated purchase request. Immutable once built.
#[derive(Clone, Debug)]
pub struct PurchaseRequest {
    pub referral_code: String,
    pub quantity: u32,
    pub bonus_plan: u32,
    pub diagnostics: bool,
}

impl PurchaseForm {
    /// Parse the raw fields. Every rejection here is `InvalidInput`; no
    /// collaborator is consulted for a form that fails to parse.
    pub fn validate(&self) -> Result<PurchaseRequest> {
        let referral_code = self.referral_code.trim();
        if referral_code.is_empty() {
            return Err(CheckoutError::InvalidInput {
                detail: "referral code is empty".into(),
            });
        }

        let quantity: u32 =
            self.quantity
                .trim()
                .parse()
                .map_err(|_| CheckoutError::InvalidInput {
                    detail: format!("quantity {:?} is not a whole number", self.quantity),
                })?;
        if quantity == 0 {
            return Err(CheckoutError::InvalidInput {
                detail: "quantity must be at least 1".into(),
            });
        }

        let bonus_plan: u32 =
            self.bonus_plan
                .trim()
                .parse()
                .map_err(|_| CheckoutError::InvalidInput {
                    detail: format!("bonus plan {:?} is not a whole number", self.bonus_plan),
                })?;

        Ok(PurchaseRequest {
            referral_code: referral_code.to_string(),
            quantity,
            bonus_plan,
            diagnostics: self.diagnostics,
        })
    }
}

/// The single record posted to the purchase ledger after a settled transfer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub partner_id: String,
    pub transaction_id: String,
    pub fiat_total: f64,
    pub crypto_total: f64,
    pub quantity: u32,
    pub bonus_plan: u32,
    pub wallet_address: String,
    pub email: String,
    /// Code issued for this purchase; empty when issuance failed.
    pub issued_referral_code: String,
    /// Code the buyer supplied in the form.
    pub supplied_referral_code: String,
}

/// Result of a successful attempt. `warning` is set when post-submission
/// recording failed; the purchase itself still went through.
#[derive(Clone, Debug)]
pub struct PurchaseOutcome {
    pub transaction_id: String,
    pub success: bool,
    pub warning: Option<CheckoutError>,
    /// Opaque token for the result screen; see `receipt`.
    pub receipt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    fn form(referral: &str, quantity: &str, plan: &str) -> PurchaseForm {
        PurchaseForm {
            referral_code: referral.to_string(),
            quantity: quantity.to_string(),
            bonus_plan: plan.to_string(),
            diagnostics: false,
        }
    }

    #[test]
    fn test_valid_form_parses() {
        let request = form("FRIEND-42", "10", "2").validate().unwrap();
        assert_eq!(request.referral_code, "FRIEND-42");
        assert_eq!(request.quantity, 10);
        assert_eq!(request.bonus_plan, 2);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let request = form("  FRIEND-42  ", " 3 ", " 0 ").validate().unwrap();
        assert_eq!(request.referral_code, "FRIEND-42");
        assert_eq!(request.quantity, 3);
    }

    #[test]
    fn test_non_numeric_quantity_rejected() {
        let err = form("FRIEND-42", "ten", "0").validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let err = form("FRIEND-42", "2.5", "0").validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = form("FRIEND-42", "0", "0").validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    #[test]
    fn test_empty_referral_code_rejected() {
        let err = form("   ", "1", "0").validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }

    #[test]
    fn test_non_numeric_bonus_plan_rejected() {
        let err = form("FRIEND-42", "1", "gold").validate().unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }
}
