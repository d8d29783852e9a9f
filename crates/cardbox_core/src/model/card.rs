//! Card domain model.
//!
//! # Responsibility
//! - Define the canonical persisted card record.
//! - Define the four-color category taxonomy and its derived tables
//!   (address prefix, GTD bucket).
//! - Provide pure edge-list helpers for the directed relation graph.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another card.
//! - `category` is one of exactly four values; nothing else is ever stored.
//! - `related_cards` never contains the card's own `uuid` and never
//!   contains the same target twice.
//! - `address` is a display label, not a lookup key; it carries no
//!   uniqueness guarantee.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every persisted card.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CardId = Uuid;

/// Four-color classification assigned to every knowledge card.
///
/// Historically rendered as blue/green/yellow/red; the enum is the
/// closed source of truth, the colors are presentation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Theories, models, frameworks and other load-bearing ideas.
    CoreConcept,
    /// Associations and comparisons between ideas.
    Link,
    /// Sources, citations, documents.
    Reference,
    /// Terms, definitions, tags.
    Keyword,
}

impl Category {
    /// All categories in classifier rule order.
    pub const ALL: [Category; 4] = [
        Category::CoreConcept,
        Category::Link,
        Category::Reference,
        Category::Keyword,
    ];

    /// Fixed single-letter address prefix for this category.
    pub fn address_prefix(self) -> &'static str {
        match self {
            Self::CoreConcept => "A",
            Self::Link => "B",
            Self::Reference => "C",
            Self::Keyword => "D",
        }
    }

    /// Static category-to-bucket table used when imported candidates are
    /// committed. `Today` is reachable only by explicit user re-bucketing
    /// outside this core.
    pub fn gtd_bucket(self) -> GtdBucket {
        match self {
            Self::CoreConcept => GtdBucket::Projects,
            Self::Link => GtdBucket::Later,
            Self::Reference => GtdBucket::Archive,
            Self::Keyword => GtdBucket::Inbox,
        }
    }
}

/// GTD workflow bucket derived from a card's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GtdBucket {
    Inbox,
    Today,
    Later,
    Archive,
    Projects,
}

/// Validation failure for card state prior to persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Address is empty after trimming.
    EmptyAddress,
    /// `related_cards` contains the card's own id.
    SelfRelation(CardId),
    /// `related_cards` contains the same target more than once.
    DuplicateRelation(CardId),
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "card title must not be empty"),
            Self::EmptyAddress => write!(f, "card address must not be empty"),
            Self::SelfRelation(id) => write!(f, "card {id} must not relate to itself"),
            Self::DuplicateRelation(id) => {
                write!(f, "card relation target {id} appears more than once")
            }
        }
    }
}

impl Error for CardValidationError {}

/// Canonical persisted knowledge card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable global ID used as the store key and for relation edges.
    pub uuid: CardId,
    /// Short display title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Four-color classification.
    pub category: Category,
    /// Category-prefixed display address (no uniqueness guarantee).
    pub address: String,
    /// Unix epoch milliseconds. `0` means "let the store assign it".
    pub created_at: i64,
    /// Outgoing directed relation edges, in insertion order.
    pub related_cards: Vec<CardId>,
}

impl Card {
    /// Creates a new card with a generated stable ID and no relations.
    ///
    /// `created_at` starts as `0`; the store replaces it with the current
    /// time at insert.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: Category,
        address: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, content, category, address)
    }

    /// Creates a new card with a caller-provided stable ID.
    ///
    /// Used by tests and by import paths where identity already exists.
    pub fn with_id(
        uuid: CardId,
        title: impl Into<String>,
        content: impl Into<String>,
        category: Category,
        address: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            title: title.into(),
            content: content.into(),
            category,
            address: address.into(),
            created_at: 0,
            related_cards: Vec::new(),
        }
    }

    /// Checks all card invariants that persistence relies on.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.title.trim().is_empty() {
            return Err(CardValidationError::EmptyTitle);
        }
        if self.address.trim().is_empty() {
            return Err(CardValidationError::EmptyAddress);
        }
        for (index, target) in self.related_cards.iter().enumerate() {
            if *target == self.uuid {
                return Err(CardValidationError::SelfRelation(*target));
            }
            if self.related_cards[..index].contains(target) {
                return Err(CardValidationError::DuplicateRelation(*target));
            }
        }
        Ok(())
    }

    /// Appends a directed edge to `target`.
    ///
    /// Returns `Ok(false)` when the edge already exists (idempotent add)
    /// and rejects self-relations.
    pub fn link_to(&mut self, target: CardId) -> Result<bool, CardValidationError> {
        if target == self.uuid {
            return Err(CardValidationError::SelfRelation(target));
        }
        if self.related_cards.contains(&target) {
            return Ok(false);
        }
        self.related_cards.push(target);
        Ok(true)
    }

    /// Removes the directed edge to `target` if present.
    ///
    /// Returns whether an edge was removed; absence is a no-op.
    pub fn unlink(&mut self, target: CardId) -> bool {
        let before = self.related_cards.len();
        self.related_cards.retain(|id| *id != target);
        self.related_cards.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardValidationError, Category, GtdBucket};
    use uuid::Uuid;

    #[test]
    fn address_prefixes_are_fixed_per_category() {
        assert_eq!(Category::CoreConcept.address_prefix(), "A");
        assert_eq!(Category::Link.address_prefix(), "B");
        assert_eq!(Category::Reference.address_prefix(), "C");
        assert_eq!(Category::Keyword.address_prefix(), "D");
    }

    #[test]
    fn bucket_table_covers_every_category() {
        assert_eq!(Category::CoreConcept.gtd_bucket(), GtdBucket::Projects);
        assert_eq!(Category::Link.gtd_bucket(), GtdBucket::Later);
        assert_eq!(Category::Reference.gtd_bucket(), GtdBucket::Archive);
        assert_eq!(Category::Keyword.gtd_bucket(), GtdBucket::Inbox);
    }

    #[test]
    fn link_to_is_idempotent_and_rejects_self() {
        let mut card = Card::new("a", "body", Category::CoreConcept, "A1");
        let target = Uuid::new_v4();

        assert!(card.link_to(target).unwrap());
        assert!(!card.link_to(target).unwrap());
        assert_eq!(card.related_cards, vec![target]);

        let own = card.uuid;
        assert_eq!(
            card.link_to(own),
            Err(CardValidationError::SelfRelation(own))
        );
        assert_eq!(card.related_cards, vec![target]);
    }

    #[test]
    fn unlink_reports_whether_an_edge_existed() {
        let mut card = Card::new("a", "body", Category::Link, "B2");
        let target = Uuid::new_v4();
        card.link_to(target).unwrap();

        assert!(card.unlink(target));
        assert!(!card.unlink(target));
        assert!(card.related_cards.is_empty());
    }

    #[test]
    fn validate_rejects_empty_fields_and_bad_edges() {
        let blank = Card::new("  ", "body", Category::Keyword, "D9");
        assert_eq!(blank.validate(), Err(CardValidationError::EmptyTitle));

        let mut card = Card::new("title", "body", Category::Keyword, "D9");
        card.address = String::new();
        assert_eq!(card.validate(), Err(CardValidationError::EmptyAddress));

        let mut card = Card::new("title", "body", Category::Keyword, "D9");
        let target = Uuid::new_v4();
        card.related_cards = vec![target, target];
        assert_eq!(
            card.validate(),
            Err(CardValidationError::DuplicateRelation(target))
        );
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::CoreConcept).unwrap();
        assert_eq!(json, "\"core_concept\"");
    }
}
