#![allow(non_snake_case)]
use candid::Nat;
use loteria_client::{
    GameService,
    testing::FakeConnector,
    types::TokenKind,
    wire,
};

#[tokio::test]
async fn get_platform_volume__goes_through_the_anonymous_endpoint() {
    let actor = FakeConnector::new();
    let public = FakeConnector::new();
    public.stub_ok("getPlatformVolume", vec![wire::VolumeDto {
        token_type: wire::TokenTypeDto::Icp,
        amount: Nat::from(5_000_000_000u64),
    }]);
    let service = GameService::new(actor.clone(), public.clone());

    let volumes = service.get_platform_volume().await.unwrap();

    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].token, TokenKind::Icp);
    assert_eq!(volumes[0].base_units, 5_000_000_000);
    // Stats never touch the identity-bound endpoint.
    assert_eq!(actor.call_count(), 0);
    assert_eq!(public.calls_for("getPlatformVolume"), 1);
}

#[tokio::test]
async fn get_24h_volume__reports_every_token_with_traffic() {
    let actor = FakeConnector::new();
    let public = FakeConnector::new();
    public.stub_ok("get24hVolume", vec![
        wire::VolumeDto {
            token_type: wire::TokenTypeDto::Icp,
            amount: Nat::from(100u64),
        },
        wire::VolumeDto {
            token_type: wire::TokenTypeDto::CkBtc,
            amount: Nat::from(7u64),
        },
    ]);
    let service = GameService::new(actor, public);

    let volumes = service.get_24h_volume().await.unwrap();

    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[1].token, TokenKind::CkBtc);
}

#[tokio::test]
async fn get_largest_pots__decodes_pot_summaries() {
    let actor = FakeConnector::new();
    let public = FakeConnector::new();
    public.stub_ok("getLargestPots", vec![wire::PotSummaryDto {
        game_id: "g-1".to_string(),
        token_type: wire::TokenTypeDto::Gldt,
        amount: Nat::from(9_000_000_000u64),
    }]);
    let service = GameService::new(actor, public);

    let pots = service.get_largest_pots().await.unwrap();

    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].game_id, "g-1");
    assert_eq!(pots[0].token, TokenKind::Gldt);
}
