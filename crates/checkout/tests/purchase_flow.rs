//! End-to-end drills of the purchase workflow through its public surface,
//! with every collaborator scripted.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use nodesale_checkout::testkit::{
    Harness, RecordingLedger, ScriptedWallet, BUYER_EMAIL, TX_HASH,
};
use nodesale_checkout::{receipt, AttemptPhase, FailureKind};

#[tokio::test]
async fn test_full_purchase_journey() {
    let h = Harness::new();
    let workflow = h.workflow();

    assert_eq!(workflow.phase(), AttemptPhase::Idle);
    assert!(!workflow.in_progress());
    assert!(workflow.current_error().is_none());

    let outcome = workflow.execute(Harness::form("10")).await.unwrap();
    assert!(outcome.success, "a scripted happy path should settle");

    // The result screen can recover both fields from the token alone
    let receipt = receipt::open(&outcome.receipt).unwrap();
    assert_eq!(receipt.transaction_id, TX_HASH);
    assert_eq!(receipt.email, BUYER_EMAIL);

    // Exactly one ledger record, tied to the same transaction
    let records = h.ledger.recorded();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].transaction_id, outcome.transaction_id);

    println!("✓ Purchase settled: {}", outcome.transaction_id);
}

#[tokio::test]
async fn test_declined_wallet_then_successful_retry() {
    let mut h = Harness::new();
    h.wallet = Arc::new(ScriptedWallet::rejecting());
    let workflow = h.workflow();

    let err = workflow.execute(Harness::form("3")).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::UserRejected);
    // The surfaced message and the stored one are the same fixed string
    assert_eq!(workflow.current_error(), Some(err.to_string()));
    assert_eq!(
        workflow.phase(),
        AttemptPhase::Failed(FailureKind::UserRejected)
    );
    assert!(!workflow.in_progress());

    println!("✓ Declined in wallet: {}", err);

    // Nothing was recorded for the declined attempt
    assert!(h.ledger.recorded().is_empty());
}

#[tokio::test]
async fn test_degraded_backend_still_confirms_the_purchase() {
    let mut h = Harness::new();
    h.ledger = Arc::new(RecordingLedger::failing());
    let workflow = h.workflow();

    let outcome = workflow.execute(Harness::form("6")).await.unwrap();

    assert!(outcome.success, "recording problems must not fail the buyer");
    let warning = outcome.warning.expect("warning should be attached");
    assert_eq!(warning.kind(), FailureKind::RecordingFailed);

    // The buyer still walks away with a usable receipt
    let receipt = receipt::open(&outcome.receipt).unwrap();
    assert_eq!(receipt.transaction_id, outcome.transaction_id);

    println!("✓ Settled with warning: {}", warning);
}

#[tokio::test]
async fn test_form_is_validated_before_any_spend() {
    let h = Harness::new();
    let workflow = h.workflow();

    let err = workflow.execute(Harness::form("lots")).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::InvalidInput);
    assert_eq!(h.wallet.submissions.load(Ordering::SeqCst), 0);
    assert_eq!(h.oracle.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.catalog.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_attempt_does_not_wedge_the_workflow() {
    let mut h = Harness::new();
    h.wallet = Arc::new(ScriptedWallet::out_of_funds());
    let workflow = h.workflow();

    let err = workflow.execute(Harness::form("1")).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::InsufficientFunds);
    assert!(!workflow.in_progress());

    // A terminal failure is not `Busy`: the next attempt starts normally
    // and reaches the wallet again
    let err = workflow.execute(Harness::form("1")).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::InsufficientFunds);
    assert_eq!(h.wallet.submissions.load(Ordering::SeqCst), 2);
    assert_eq!(workflow.current_error(), Some(err.to_string()));
}
