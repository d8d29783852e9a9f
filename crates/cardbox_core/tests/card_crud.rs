use cardbox_core::db::migrations::latest_version;
use cardbox_core::db::open_db_in_memory;
use cardbox_core::{
    Card, CardListQuery, CardRepository, CardService, CardServiceError, CardSuggestion, Category,
    NewCardRequest, RepoError, SeededRandom, SqliteCardRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip_assigns_created_at() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    let card = Card::new("Graph theory", "Nodes and edges.", Category::CoreConcept, "A3");
    let id = repo.create_card(&card).unwrap();

    let loaded = repo.get_card(id).unwrap().unwrap();
    assert_eq!(loaded.uuid, card.uuid);
    assert_eq!(loaded.title, "Graph theory");
    assert_eq!(loaded.category, Category::CoreConcept);
    assert_eq!(loaded.address, "A3");
    assert!(loaded.created_at > 0, "store should assign created_at");
    assert!(loaded.related_cards.is_empty());
}

#[test]
fn create_preserves_caller_supplied_created_at() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    let mut card = Card::new("Pinned", "body", Category::Keyword, "D1");
    card.created_at = 1_234_567_890_000;
    repo.create_card(&card).unwrap();

    let loaded = repo.get_card(card.uuid).unwrap().unwrap();
    assert_eq!(loaded.created_at, 1_234_567_890_000);
}

#[test]
fn update_existing_card_replaces_scalar_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    let mut card = Card::new("Draft", "draft body", Category::Keyword, "D4");
    repo.create_card(&card).unwrap();

    card.title = "Final".to_string();
    card.content = "final body".to_string();
    card.category = Category::Reference;
    card.address = "C9".to_string();
    repo.update_card(&card).unwrap();

    let loaded = repo.get_card(card.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "Final");
    assert_eq!(loaded.category, Category::Reference);
    assert_eq!(loaded.address, "C9");
}

#[test]
fn update_not_found_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    let card = Card::new("Missing", "body", Category::Link, "B7");
    let err = repo.update_card(&card).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == card.uuid));
}

#[test]
fn delete_is_hard_and_not_found_after() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    let card = Card::new("Doomed", "body", Category::Link, "B2");
    repo.create_card(&card).unwrap();

    repo.delete_card(card.uuid).unwrap();
    assert!(repo.get_card(card.uuid).unwrap().is_none());

    let err = repo.delete_card(card.uuid).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == card.uuid));
}

#[test]
fn list_filters_by_category() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    repo.create_card(&Card::new("c", "concept", Category::CoreConcept, "A1"))
        .unwrap();
    repo.create_card(&Card::new("r", "reference", Category::Reference, "C1"))
        .unwrap();
    repo.create_card(&Card::new("k", "keyword", Category::Keyword, "D1"))
        .unwrap();

    let query = CardListQuery {
        category: Some(Category::Reference),
        ..CardListQuery::default()
    };
    let result = repo.list_cards(&query).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "r");
}

#[test]
fn list_pagination_with_limit_and_offset_is_stable() {
    let mut conn = open_db_in_memory().unwrap();
    let (id_a, id_b, id_c) = {
        let repo = SqliteCardRepository::try_new(&mut conn).unwrap();
        let card_a = card_with_fixed_id("00000000-0000-4000-8000-000000000001", "a");
        let card_b = card_with_fixed_id("00000000-0000-4000-8000-000000000002", "b");
        let card_c = card_with_fixed_id("00000000-0000-4000-8000-000000000003", "c");
        repo.create_card(&card_c).unwrap();
        repo.create_card(&card_a).unwrap();
        repo.create_card(&card_b).unwrap();
        (card_a.uuid, card_b.uuid, card_c.uuid)
    };

    conn.execute("UPDATE cards SET created_at = 1234567890000;", [])
        .unwrap();

    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();
    let query = CardListQuery {
        limit: Some(2),
        offset: 1,
        ..CardListQuery::default()
    };
    let page = repo.list_cards(&query).unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].uuid, id_b);
    assert_eq!(page[1].uuid, id_c);
    assert!(page.iter().all(|card| card.uuid != id_a));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqliteCardRepository::try_new(&mut conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_cards_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCardRepository::try_new(&mut conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("cards"))));
}

#[test]
fn repository_rejects_connection_missing_required_cards_column() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE cards (
            uuid TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteCardRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "cards",
            column: "address"
        })
    ));
}

#[test]
fn create_card_rejects_preloaded_relations() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::try_new(&mut conn).unwrap();

    let mut card = Card::new("Edges", "body", Category::Link, "B5");
    card.related_cards.push(Uuid::new_v4());

    let err = repo.create_card(&card).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_create_allocates_prefixed_address_when_missing() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::try_new(&mut conn).unwrap());
    let mut rng = SeededRandom::from_seed(11);

    let created = service
        .create_card(
            NewCardRequest {
                title: "Systems thinking".to_string(),
                content: "A framework for wholes.".to_string(),
                category: Category::CoreConcept,
                address: None,
            },
            &mut rng,
        )
        .unwrap();

    assert!(created.address.starts_with('A'));
    let slot: u32 = created.address[1..].parse().unwrap();
    assert!((1..=100).contains(&slot));
}

#[test]
fn service_create_accepts_override_address_verbatim() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::try_new(&mut conn).unwrap());
    let mut rng = SeededRandom::from_seed(11);

    let created = service
        .create_card(
            NewCardRequest {
                title: "Pinned address".to_string(),
                content: "body".to_string(),
                category: Category::Reference,
                address: Some("C7-custom".to_string()),
            },
            &mut rng,
        )
        .unwrap();

    assert_eq!(created.address, "C7-custom");
}

#[test]
fn service_create_rejects_normalized_duplicates() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::try_new(&mut conn).unwrap());
    let mut rng = SeededRandom::from_seed(11);

    let first = service
        .create_card(
            NewCardRequest {
                title: "Graph Theory".to_string(),
                content: "Nodes and edges.".to_string(),
                category: Category::CoreConcept,
                address: None,
            },
            &mut rng,
        )
        .unwrap();

    let err = service
        .create_card(
            NewCardRequest {
                title: "  graph theory ".to_string(),
                content: "NODES AND EDGES.".to_string(),
                category: Category::Keyword,
                address: None,
            },
            &mut rng,
        )
        .unwrap_err();

    assert!(matches!(err, CardServiceError::DuplicateCard(id) if id == first.uuid));
}

#[test]
fn spawn_from_suggestion_creates_card_without_relations() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::try_new(&mut conn).unwrap());
    let mut rng = SeededRandom::from_seed(11);

    let spawned = service
        .spawn_from_suggestion(
            CardSuggestion {
                title: "Follow-up reading".to_string(),
                reason: "Primary literature source for the citation.".to_string(),
            },
            &mut rng,
        )
        .unwrap();

    assert_eq!(spawned.title, "Follow-up reading");
    assert_eq!(spawned.content, "Primary literature source for the citation.");
    assert_eq!(spawned.category, Category::Reference);
    assert!(spawned.related_cards.is_empty());
}

fn card_with_fixed_id(id: &str, title: &str) -> Card {
    Card::with_id(
        Uuid::parse_str(id).unwrap(),
        title,
        "body",
        Category::CoreConcept,
        "A1",
    )
}
