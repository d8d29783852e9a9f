//! Directed relation-graph service.
//!
//! # Responsibility
//! - Maintain the ordered outgoing edge list of a single card.
//! - Resolve edges against the store at read time.
//!
//! # Invariants
//! - The graph is directed and one-sided by construction: adding an edge
//!   from A to B never touches B. Undirected semantics exist only through
//!   the explicit [`RelationService::add_symmetric_relation`] helper.
//! - Self-relations are rejected with an explicit error on every add
//!   path; this is never a silent no-op.
//! - Duplicate adds are idempotent; removals of absent edges are no-ops.
//! - Dangling targets (deleted cards) stay in storage and are dropped
//!   silently when listing.

use crate::model::card::{Card, CardId, CardValidationError};
use crate::repo::card_repo::{CardRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for relation edits.
#[derive(Debug)]
pub enum RelationError {
    /// A card may not relate to itself.
    SelfRelation(CardId),
    /// The card whose edge list is being edited does not exist.
    CardNotFound(CardId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for RelationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfRelation(id) => write!(f, "card {id} cannot relate to itself"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RelationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RelationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CardNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Relation-graph facade over repository implementations.
pub struct RelationService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> RelationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a directed edge from `card_id` to `target_id`.
    ///
    /// Returns `Ok(false)` when the edge already existed. The target is
    /// not required to exist; edges to unknown ids are tolerated the same
    /// way dangling edges after delete are.
    pub fn add_relation(
        &mut self,
        card_id: CardId,
        target_id: CardId,
    ) -> Result<bool, RelationError> {
        if target_id == card_id {
            return Err(RelationError::SelfRelation(card_id));
        }

        let mut card = self.load(card_id)?;
        let changed = match card.link_to(target_id) {
            Ok(changed) => changed,
            Err(CardValidationError::SelfRelation(id)) => {
                return Err(RelationError::SelfRelation(id))
            }
            Err(other) => return Err(RelationError::Repo(other.into())),
        };
        if changed {
            self.repo.set_relations(card_id, &card.related_cards)?;
        }
        Ok(changed)
    }

    /// Removes the directed edge from `card_id` to `target_id`.
    ///
    /// Returns whether an edge was removed; absence is a no-op.
    pub fn remove_relation(
        &mut self,
        card_id: CardId,
        target_id: CardId,
    ) -> Result<bool, RelationError> {
        let mut card = self.load(card_id)?;
        let changed = card.unlink(target_id);
        if changed {
            self.repo.set_relations(card_id, &card.related_cards)?;
        }
        Ok(changed)
    }

    /// Resolves the card's edge list against the store, silently dropping
    /// targets that no longer resolve (tombstone filtering at read time).
    pub fn list_related(&self, card_id: CardId) -> Result<Vec<Card>, RelationError> {
        let card = self.load(card_id)?;
        let mut related = Vec::new();
        for target in &card.related_cards {
            if let Some(resolved) = self.repo.get_card(*target)? {
                related.push(resolved);
            }
        }
        Ok(related)
    }

    /// Adds edges in both directions between two existing cards.
    ///
    /// Layered on top of the directed graph; each side is added with the
    /// same idempotence and self-relation rules as `add_relation`. Both
    /// cards must exist, unlike the one-sided add.
    pub fn add_symmetric_relation(
        &mut self,
        first_id: CardId,
        second_id: CardId,
    ) -> Result<(), RelationError> {
        if first_id == second_id {
            return Err(RelationError::SelfRelation(first_id));
        }
        // Resolve both up front so a missing side fails before any write.
        self.load(second_id)?;
        self.add_relation(first_id, second_id)?;
        self.add_relation(second_id, first_id)?;
        Ok(())
    }

    fn load(&self, card_id: CardId) -> Result<Card, RelationError> {
        self.repo
            .get_card(card_id)?
            .ok_or(RelationError::CardNotFound(card_id))
    }
}
