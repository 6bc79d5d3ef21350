#![allow(non_snake_case)]
use candid::Encode;
use loteria_client::{
    GameService,
    error::GameError,
    testing::{
        self,
        FakeConnector,
    },
    types::PayeeRole,
    wire,
};

fn service(connector: &FakeConnector) -> GameService<FakeConnector> {
    GameService::new(connector.clone(), connector.clone())
}

#[tokio::test]
async fn claim_win__completed_payout_is_ok() {
    let connector = FakeConnector::new();
    connector.stub_ok("claimWin", wire::ClaimOutcomeDto::Completed);

    service(&connector).claim_win("g-1", 7).await.unwrap();
}

#[tokio::test]
async fn claim_win__partial_payout_is_distinct_from_rejection() {
    let connector = FakeConnector::new();
    connector.stub_ok(
        "claimWin",
        wire::ClaimOutcomeDto::Partial(testing::failed_claim("g-1")),
    );

    let result = service(&connector).claim_win("g-1", 7).await;

    let err = result.unwrap_err();
    assert!(!matches!(err, GameError::Rejected(_)));
    let claim = err.retryable_claim().expect("claim should be retryable");
    assert_eq!(claim.game_id, "g-1");
    assert_eq!(claim.last_error, "host transfer failed");

    // Only the unpaid shares remain owed.
    let unpaid: Vec<_> = claim.unpaid_shares().collect();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].role, PayeeRole::Host);
}

#[tokio::test]
async fn claim_win__outright_rejection_has_no_retryable_claim() {
    let connector = FakeConnector::new();
    connector.stub_err("claimWin", "tabla has no winning pattern");

    let err = service(&connector).claim_win("g-1", 7).await.unwrap_err();

    assert!(matches!(err, GameError::Rejected(_)));
    assert!(err.retryable_claim().is_none());
}

#[tokio::test]
async fn retry_failed_claim__second_partial_failure_is_surfaced_again() {
    let connector = FakeConnector::new();
    connector.stub_ok(
        "retryFailedClaim",
        wire::ClaimOutcomeDto::Partial(testing::failed_claim("g-1")),
    );

    let err = service(&connector)
        .retry_failed_claim("g-1")
        .await
        .unwrap_err();

    assert!(err.retryable_claim().is_some());
}

#[tokio::test]
async fn retry_failed_claim__completion_clears_the_claim() {
    let connector = FakeConnector::new();
    connector.stub_ok("retryFailedClaim", wire::ClaimOutcomeDto::Completed);

    service(&connector).retry_failed_claim("g-1").await.unwrap();

    let calls = connector.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, Encode!(&"g-1").unwrap());
}

#[tokio::test]
async fn get_failed_claims__decodes_recorded_claims() {
    let connector = FakeConnector::new();
    connector.stub_ok("getFailedClaims", vec![testing::failed_claim("g-1")]);

    let claims = service(&connector).get_failed_claims().await.unwrap();

    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].tabla_id, 7);
    assert_eq!(claims[0].payouts.len(), 2);
}
