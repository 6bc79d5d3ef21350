#![allow(non_snake_case)]
use loteria_client::{
    CreateGameParams,
    GameService,
    error::GameError,
    testing::FakeConnector,
    types::{
        GameMode,
        TokenKind,
    },
};

fn service(connector: &FakeConnector) -> GameService<FakeConnector> {
    GameService::new(connector.clone(), connector.clone())
}

fn params() -> CreateGameParams {
    CreateGameParams {
        name: "viernes noche".to_string(),
        mode: GameMode::Line,
        token: TokenKind::Icp,
        entry_fee_tokens: 2,
        host_fee_percent: 5,
    }
}

#[tokio::test]
async fn create_game__returns_new_game_id() {
    let connector = FakeConnector::new();
    connector.stub_ok("createGame", "g-41".to_string());

    let game_id = service(&connector).create_game(&params()).await.unwrap();

    assert_eq!(game_id, "g-41");
    assert_eq!(connector.calls_for("createGame"), 1);
}

#[tokio::test]
async fn create_game__excessive_host_fee_fails_without_network_call() {
    let connector = FakeConnector::new();
    let mut bad = params();
    bad.host_fee_percent = 21;

    let result = service(&connector).create_game(&bad).await;

    assert!(matches!(result, Err(GameError::Validation(_))));
    assert_eq!(connector.call_count(), 0);
}

#[tokio::test]
async fn create_game__blank_name_fails_without_network_call() {
    let connector = FakeConnector::new();
    let mut bad = params();
    bad.name = "   ".to_string();

    let result = service(&connector).create_game(&bad).await;

    assert!(matches!(result, Err(GameError::Validation(_))));
    assert_eq!(connector.call_count(), 0);
}

#[tokio::test]
async fn create_game__remote_rejection_carries_reason() {
    let connector = FakeConnector::new();
    connector.stub_err("createGame", "host already has an open game");

    let result = service(&connector).create_game(&params()).await;

    match result {
        Err(GameError::Rejected(reason)) => {
            assert_eq!(reason, "host already has an open game");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}
