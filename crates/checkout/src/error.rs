use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Discriminant for every classified failure. `RecordingFailed` never fails
/// an attempt; it rides along on a successful outcome as a warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    NoPartnerContext,
    PartnerLookupFailed,
    InsufficientCapacity,
    MissingStoredIdentity,
    WrongNetwork,
    ConversionFailed,
    InsufficientFunds,
    UserRejected,
    SubmissionFailed,
    RecordingFailed,
    Busy,
}

/// Classified purchase failures. The display string is the user-facing
/// message and is fixed per variant; raw collaborator details live in the
/// payload fields and only ever reach the logs.
#[derive(Error, Debug, Clone)]
pub enum CheckoutError {
    #[error("Please enter a valid referral code, quantity and bonus plan.")]
    InvalidInput { detail: String },

    #[error("No partner is selected for this purchase.")]
    NoPartnerContext,

    #[error("Could not load partner availability. Please try again.")]
    PartnerLookupFailed { detail: String },

    #[error("Not enough units left in this partner's allocation.")]
    InsufficientCapacity { requested: u64, available: u64 },

    #[error("No email on file. Please sign in again.")]
    MissingStoredIdentity,

    #[error("Your wallet is connected to the wrong network.")]
    WrongNetwork { required: String },

    #[error("Could not fetch the current exchange rate. Please try again.")]
    ConversionFailed { detail: String },

    #[error("Your wallet does not have enough funds for this purchase.")]
    InsufficientFunds,

    #[error("The transaction was declined in your wallet.")]
    UserRejected,

    #[error("The transaction could not be completed. Please try again.")]
    SubmissionFailed { detail: String },

    #[error("Your payment went through, but the purchase could not be recorded. Keep your receipt.")]
    RecordingFailed { detail: String },

    #[error("A purchase is already in progress.")]
    Busy,
}

impl CheckoutError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CheckoutError::InvalidInput { .. } => FailureKind::InvalidInput,
            CheckoutError::NoPartnerContext => FailureKind::NoPartnerContext,
            CheckoutError::PartnerLookupFailed { .. } => FailureKind::PartnerLookupFailed,
            CheckoutError::InsufficientCapacity { .. } => FailureKind::InsufficientCapacity,
            CheckoutError::MissingStoredIdentity => FailureKind::MissingStoredIdentity,
            CheckoutError::WrongNetwork { .. } => FailureKind::WrongNetwork,
            CheckoutError::ConversionFailed { .. } => FailureKind::ConversionFailed,
            CheckoutError::InsufficientFunds => FailureKind::InsufficientFunds,
            CheckoutError::UserRejected => FailureKind::UserRejected,
            CheckoutError::SubmissionFailed { .. } => FailureKind::SubmissionFailed,
            CheckoutError::RecordingFailed { .. } => FailureKind::RecordingFailed,
            CheckoutError::Busy => FailureKind::Busy,
        }
    }

    /// Raw collaborator detail, when this variant carries one. Never shown to
    /// the user; surfaced in diagnostics logging only.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CheckoutError::InvalidInput { detail }
            | CheckoutError::PartnerLookupFailed { detail }
            | CheckoutError::ConversionFailed { detail }
            | CheckoutError::SubmissionFailed { detail }
            | CheckoutError::RecordingFailed { detail } => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_never_leak_collaborator_detail() {
        let err = CheckoutError::SubmissionFailed {
            detail: "RPC -32603: execution reverted".into(),
        };
        assert!(!err.to_string().contains("-32603"));
        assert_eq!(err.detail(), Some("RPC -32603: execution reverted"));
    }

    #[test]
    fn test_funds_message_differs_from_generic_submission_message() {
        let funds = CheckoutError::InsufficientFunds.to_string();
        let generic = CheckoutError::SubmissionFailed { detail: String::new() }.to_string();
        assert_ne!(funds, generic);
        assert!(funds.contains("funds"));
    }

    #[test]
    fn test_kind_mapping() {
        let err = CheckoutError::InsufficientCapacity {
            requested: 3,
            available: 1,
        };
        assert_eq!(err.kind(), FailureKind::InsufficientCapacity);
        assert_eq!(CheckoutError::Busy.kind(), FailureKind::Busy);
    }
}
