//! Card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `cards` and `card_relations` tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Card::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Relation edges are replaced wholesale in one immediate transaction.
//! - Deleting a card removes its own outgoing edges (FK cascade) and
//!   nothing else; inbound edges from other cards stay in place.

use crate::db::{migrations, DbError};
use crate::model::card::{Card, CardId, CardValidationError, Category};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CARD_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    category,
    address,
    created_at
FROM cards";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "cards",
        &["uuid", "title", "content", "category", "address", "created_at"],
    ),
    ("card_relations", &["card_uuid", "target_uuid", "position"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for card persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CardValidationError),
    Db(DbError),
    NotFound(CardId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "card not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted card data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CardValidationError> for RepoError {
    fn from(value: CardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing cards.
#[derive(Debug, Clone, Default)]
pub struct CardListQuery {
    pub category: Option<Category>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for card CRUD and relation persistence.
pub trait CardRepository {
    /// Persists a new card. The card's relation list must be empty;
    /// edges are written only through [`CardRepository::set_relations`].
    fn create_card(&self, card: &Card) -> RepoResult<CardId>;
    /// Updates title/content/category/address of an existing card.
    fn update_card(&self, card: &Card) -> RepoResult<()>;
    /// Gets one card with its ordered relation list.
    fn get_card(&self, id: CardId) -> RepoResult<Option<Card>>;
    /// Lists cards using filter and pagination options.
    fn list_cards(&self, query: &CardListQuery) -> RepoResult<Vec<Card>>;
    /// Hard-deletes a card and its own outgoing edges.
    fn delete_card(&self, id: CardId) -> RepoResult<()>;
    /// Replaces the whole ordered relation list for one card.
    fn set_relations(&mut self, id: CardId, targets: &[CardId]) -> RepoResult<()>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not
    ///   match the latest migration.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema
    ///   was tampered with.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn create_card(&self, card: &Card) -> RepoResult<CardId> {
        card.validate()?;
        if !card.related_cards.is_empty() {
            return Err(RepoError::InvalidData(
                "create_card persists scalar fields only; use set_relations for edges".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO cards (uuid, title, content, category, address, created_at)
             VALUES (
                ?1, ?2, ?3, ?4, ?5,
                CASE WHEN ?6 = 0 THEN (strftime('%s', 'now') * 1000) ELSE ?6 END
             );",
            params![
                card.uuid.to_string(),
                card.title.as_str(),
                card.content.as_str(),
                category_to_db(card.category),
                card.address.as_str(),
                card.created_at,
            ],
        )?;

        Ok(card.uuid)
    }

    fn update_card(&self, card: &Card) -> RepoResult<()> {
        card.validate()?;

        let changed = self.conn.execute(
            "UPDATE cards
             SET
                title = ?1,
                content = ?2,
                category = ?3,
                address = ?4
             WHERE uuid = ?5;",
            params![
                card.title.as_str(),
                card.content.as_str(),
                category_to_db(card.category),
                card.address.as_str(),
                card.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(card.uuid));
        }

        Ok(())
    }

    fn get_card(&self, id: CardId) -> RepoResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut card = parse_card_row(row)?;
            card.related_cards = load_relations(self.conn, id)?;
            return Ok(Some(card));
        }

        Ok(None)
    }

    fn list_cards(&self, query: &CardListQuery) -> RepoResult<Vec<Card>> {
        let mut sql = format!("{CARD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category_to_db(category).to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut cards = Vec::new();

        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }

        for card in &mut cards {
            card.related_cards = load_relations(self.conn, card.uuid)?;
        }

        Ok(cards)
    }

    fn delete_card(&self, id: CardId) -> RepoResult<()> {
        // Outgoing edges go with the row via FK cascade. Inbound edges on
        // other cards stay; reads filter them lazily.
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_relations(&mut self, id: CardId, targets: &[CardId]) -> RepoResult<()> {
        for (index, target) in targets.iter().enumerate() {
            if *target == id {
                return Err(CardValidationError::SelfRelation(*target).into());
            }
            if targets[..index].contains(target) {
                return Err(CardValidationError::DuplicateRelation(*target).into());
            }
        }

        let id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM cards WHERE uuid = ?1);",
            [id_text.as_str()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "DELETE FROM card_relations WHERE card_uuid = ?1;",
            [id_text.as_str()],
        )?;
        for (position, target) in targets.iter().enumerate() {
            tx.execute(
                "INSERT INTO card_relations (card_uuid, target_uuid, position)
                 VALUES (?1, ?2, ?3);",
                params![id_text.as_str(), target.to_string(), position as i64],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = migrations::latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in REQUIRED_SCHEMA {
        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable(table));
        }

        for column in *columns {
            let column_exists: i64 = conn.query_row(
                &format!(
                    "SELECT EXISTS(
                        SELECT 1 FROM pragma_table_info('{table}') WHERE name = ?1
                    );"
                ),
                [*column],
                |row| row.get(0),
            )?;
            if column_exists == 0 {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text)?;

    let category_text: String = row.get("category")?;
    let category = parse_category(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in cards.category"
        ))
    })?;

    Ok(Card {
        uuid,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
        related_cards: Vec::new(),
    })
}

fn load_relations(conn: &Connection, id: CardId) -> RepoResult<Vec<CardId>> {
    let mut stmt = conn.prepare(
        "SELECT target_uuid
         FROM card_relations
         WHERE card_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    let mut targets = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        targets.push(parse_uuid(&value)?);
    }
    Ok(targets)
}

fn parse_uuid(value: &str) -> RepoResult<CardId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}`")))
}

fn category_to_db(category: Category) -> &'static str {
    match category {
        Category::CoreConcept => "core_concept",
        Category::Link => "link",
        Category::Reference => "reference",
        Category::Keyword => "keyword",
    }
}

fn parse_category(value: &str) -> Option<Category> {
    match value {
        "core_concept" => Some(Category::CoreConcept),
        "link" => Some(Category::Link),
        "reference" => Some(Category::Reference),
        "keyword" => Some(Category::Keyword),
        _ => None,
    }
}
