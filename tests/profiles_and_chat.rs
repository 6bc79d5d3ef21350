#![allow(non_snake_case)]
use loteria_client::{
    CreateTablaParams,
    GameService,
    error::GameError,
    testing::{
        self,
        FakeConnector,
    },
    types::Rarity,
    wire,
};

fn service(connector: &FakeConnector) -> GameService<FakeConnector> {
    GameService::new(connector.clone(), connector.clone())
}

#[tokio::test]
async fn create_profile__short_username_fails_without_network_call() {
    let connector = FakeConnector::new();

    let result = service(&connector).create_profile("abcd").await;

    assert!(matches!(result, Err(GameError::Validation(_))));
    assert_eq!(connector.call_count(), 0);
}

#[tokio::test]
async fn create_profile__rejects_non_alphanumeric_characters() {
    let connector = FakeConnector::new();

    assert!(service(&connector).create_profile("perro azul").await.is_err());
    assert!(service(&connector).create_profile("perro_azul").await.is_err());
    assert_eq!(connector.call_count(), 0);
}

#[tokio::test]
async fn update_tag__hyphenated_username_is_accepted() {
    let connector = FakeConnector::new();
    connector.stub_ack("updateTag");

    service(&connector).update_tag("perro-azul7").await.unwrap();

    assert_eq!(connector.calls_for("updateTag"), 1);
}

#[tokio::test]
async fn get_profile__absent_profile_is_none() {
    let connector = FakeConnector::new();
    let empty: Vec<wire::ProfileDto> = Vec::new();
    connector.stub_ok("getProfile", empty);

    let profile = service(&connector).get_profile().await.unwrap();

    assert!(profile.is_none());
}

#[tokio::test]
async fn get_profile__missing_username_falls_back_to_short_principal() {
    let connector = FakeConnector::new();
    connector.stub_ok("getProfile", vec![wire::ProfileDto {
        principal: testing::principal(3),
        username: Vec::new(),
    }]);

    let profile = service(&connector).get_profile().await.unwrap().unwrap();

    assert!(profile.username.is_none());
    let display = profile.display_name();
    assert!(display.contains('…'), "expected abbreviated principal, got {display}");
}

#[tokio::test]
async fn send_chat_message__blank_text_fails_without_network_call() {
    let connector = FakeConnector::new();

    let result = service(&connector).send_chat_message("g-1", "  ").await;

    assert!(matches!(result, Err(GameError::Validation(_))));
    assert_eq!(connector.call_count(), 0);
}

#[tokio::test]
async fn get_chat_messages__decodes_thread_in_order() {
    let connector = FakeConnector::new();
    connector.stub_ok("getChatMessages", vec![
        wire::ChatMessageDto {
            sender: testing::principal(1),
            username: vec!["host-uno".to_string()],
            text: "buenas".to_string(),
            sent_at: 1,
        },
        wire::ChatMessageDto {
            sender: testing::principal(2),
            username: Vec::new(),
            text: "loteria!".to_string(),
            sent_at: 2,
        },
    ]);

    let messages = service(&connector).get_chat_messages("g-1").await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "buenas");
    assert_eq!(messages[1].sent_at, 2);
}

#[tokio::test]
async fn is_admin__decodes_plain_bool() {
    let connector = FakeConnector::new();
    connector.stub_plain("isAdmin", false);

    assert!(!service(&connector).is_admin().await.unwrap());
}

#[tokio::test]
async fn admin_batch_tablas__wrong_card_count_fails_without_network_call() {
    let connector = FakeConnector::new();
    let bad = CreateTablaParams {
        tabla_id: 200,
        cards: vec![1, 2, 3],
        rarity: Rarity::Common,
        rental_fee: 10_000_000,
        owner: testing::principal(2),
        image: None,
    };

    let result = service(&connector).admin_batch_tablas(&[bad]).await;

    assert!(matches!(result, Err(GameError::Validation(_))));
    assert_eq!(connector.call_count(), 0);
}

#[tokio::test]
async fn admin_batch_tablas__returns_created_count() {
    let connector = FakeConnector::new();
    connector.stub_ok("adminBatchTablas", 2u32);
    let tabla = |id| CreateTablaParams {
        tabla_id: id,
        cards: (1..=16).collect(),
        rarity: Rarity::Epic,
        rental_fee: 10_000_000,
        owner: testing::principal(2),
        image: None,
    };

    let created = service(&connector)
        .admin_batch_tablas(&[tabla(200), tabla(201)])
        .await
        .unwrap();

    assert_eq!(created, 2);
}
