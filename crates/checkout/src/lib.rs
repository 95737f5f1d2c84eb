pub mod clients;
pub mod collaborators;
pub mod error;
pub mod partner;
pub mod pricing;
pub mod purchase;
pub mod receipt;
pub mod session;
pub mod workflow;

#[cfg(any(test, feature = "test-utils"))]
pub mod testkit;

pub use error::{CheckoutError, FailureKind, Result};
pub use purchase::{PurchaseForm, PurchaseOutcome, PurchaseRecord, PurchaseRequest};
pub use receipt::Receipt;
pub use workflow::{AttemptPhase, Collaborators, PurchaseWorkflow, WorkflowConfig};
