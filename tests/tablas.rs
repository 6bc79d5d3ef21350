#![allow(non_snake_case)]
use candid::{
    Encode,
    Nat,
};
use loteria_client::{
    GameService,
    error::GameError,
    testing::{
        self,
        FakeConnector,
    },
    types::{
        Rarity,
        TablaInfo,
        TablaStatus,
    },
    wire,
};

fn service(connector: &FakeConnector) -> GameService<FakeConnector> {
    GameService::new(connector.clone(), connector.clone())
}

#[tokio::test]
async fn get_available_tablas__decodes_inventory() {
    let connector = FakeConnector::new();
    connector.stub_ok("getAvailableTablas", vec![testing::tabla(3)]);

    let tablas = service(&connector).get_available_tablas().await;

    assert_eq!(tablas.len(), 1);
    assert_eq!(tablas[0].tabla_id, 3);
    assert_eq!(tablas[0].rarity, Rarity::Rare);
    assert_eq!(tablas[0].status, TablaStatus::Available);
}

#[tokio::test]
async fn get_available_tablas__degrades_to_empty_on_failure() {
    let connector = FakeConnector::new();

    let tablas = service(&connector).get_available_tablas().await;

    assert!(tablas.is_empty());
}

#[tokio::test]
async fn get_available_tablas_for_game__propagates_failure() {
    let connector = FakeConnector::new();
    connector.stub_err("getAvailableTablasForGame", "game not found");

    let result = service(&connector).get_available_tablas_for_game("g-404").await;

    // The join flow must be able to tell a failed fetch from an empty
    // inventory.
    assert!(matches!(result, Err(GameError::Rejected(_))));
}

#[tokio::test]
async fn get_tabla__wrong_card_count_is_malformed() {
    let connector = FakeConnector::new();
    let mut short = testing::tabla(3);
    short.cards.truncate(15);
    connector.stub_ok("getTabla", vec![short]);

    let result = service(&connector).get_tabla(3).await;

    assert!(matches!(result, Err(GameError::MalformedResponse(_))));
}

#[tokio::test]
async fn get_tabla_cards__degrades_to_empty_on_failure() {
    let connector = FakeConnector::new();

    let cards = service(&connector).get_tabla_cards(3).await;

    assert!(cards.is_empty());
}

#[tokio::test]
async fn get_tabla_count__decodes_plain_nat() {
    let connector = FakeConnector::new();
    connector.stub_plain("tablaCount", Nat::from(128u64));

    let count = service(&connector).get_tabla_count().await.unwrap();

    assert_eq!(count, 128);
}

#[tokio::test]
async fn get_tabla_stats__missing_stats_read_as_none() {
    let connector = FakeConnector::new();
    connector.stub_err("getTablaStats", "no stats recorded");

    let stats = service(&connector).get_tabla_stats(3).await;

    assert!(stats.is_none());
}

#[test]
fn tabla_info__card_at_maps_row_major_grid() {
    let tabla = TablaInfo::try_from(testing::tabla(3)).unwrap();

    assert_eq!(tabla.card_at(0, 0), Some(1));
    assert_eq!(tabla.card_at(0, 3), Some(4));
    assert_eq!(tabla.card_at(3, 3), Some(16));
    assert_eq!(tabla.card_at(4, 0), None);
}

#[tokio::test]
async fn update_rental_fee__sends_new_fee_on_the_wire() {
    let connector = FakeConnector::new();
    connector.stub_ack("updateRentalFee");

    service(&connector).update_rental_fee(3, 25_000_000).await.unwrap();

    let calls = connector.calls();
    assert_eq!(calls.len(), 1);
    let expected = Encode!(&wire::UpdateRentalFeeRequest {
        tabla_id: 3,
        new_fee: Nat::from(25_000_000u64),
    })
    .unwrap();
    assert_eq!(calls[0].args, expected);
}
