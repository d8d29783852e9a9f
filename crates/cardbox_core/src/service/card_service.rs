//! Single-card use-case service.
//!
//! # Responsibility
//! - Provide the manual create path (allocate address, exact-match dedup).
//! - Provide the non-linking spawn-from-suggestion creation path.
//! - Provide update/get/list/delete entry points.
//!
//! # Invariants
//! - A create is rejected when an existing card matches on both
//!   normalized title and content.
//! - Spawned cards never carry a relation edge back to the card whose
//!   suggestion produced them.

use crate::engine::address::allocate;
use crate::engine::classify::classify;
use crate::engine::dedup::find_duplicate;
use crate::engine::rng::RandomSource;
use crate::model::card::{Card, CardId, Category};
use crate::repo::card_repo::{CardListQuery, CardRepository, RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for single-card use-cases.
#[derive(Debug)]
pub enum CardServiceError {
    /// The new card exactly matches an existing one.
    DuplicateCard(CardId),
    /// Target card does not exist.
    CardNotFound(CardId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCard(id) => {
                write!(f, "an identical card already exists: {id}")
            }
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent card state: {details}"),
        }
    }
}

impl Error for CardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CardServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CardNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Input for the manual create path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCardRequest {
    pub title: String,
    pub content: String,
    pub category: Category,
    /// Optional caller-supplied address; `None` or blank means generate.
    pub address: Option<String>,
}

/// Title/reason pair offered by the presentation layer's suggestion UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSuggestion {
    pub title: String,
    pub reason: String,
}

/// Card service facade over repository implementations.
pub struct CardService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> CardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one card from user-supplied fields.
    ///
    /// Allocates an address when the request carries none, then rejects
    /// the insertion when an existing card matches on both normalized
    /// fields.
    pub fn create_card(
        &self,
        request: NewCardRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<Card, CardServiceError> {
        let address = allocate(request.category, request.address.as_deref(), rng);

        let snapshot = self.repo.list_cards(&CardListQuery::default())?;
        if let Some(existing) = find_duplicate(&request.title, &request.content, &snapshot) {
            return Err(CardServiceError::DuplicateCard(existing.uuid));
        }

        let card = Card::new(request.title, request.content, request.category, address);
        let id = self.repo.create_card(&card)?;
        info!(
            "event=card_create module=card_service status=ok card={id} category={:?}",
            card.category
        );

        self.repo
            .get_card(id)?
            .ok_or(CardServiceError::InconsistentState(
                "created card not found in read-back",
            ))
    }

    /// Creates a brand-new card from a suggestion's title/reason pair.
    ///
    /// The suggestion carries no category, so the combined text runs
    /// through the normal classifier rules. No relation edge is created
    /// to the card that produced the suggestion.
    pub fn spawn_from_suggestion(
        &self,
        suggestion: CardSuggestion,
        rng: &mut dyn RandomSource,
    ) -> Result<Card, CardServiceError> {
        let combined = format!("{} {}", suggestion.title, suggestion.reason);
        let classification = classify(&combined, rng);

        self.create_card(
            NewCardRequest {
                title: suggestion.title,
                content: suggestion.reason,
                category: classification.category,
                address: None,
            },
            rng,
        )
    }

    /// Updates title/content/category/address of an existing card.
    pub fn update_card(&self, card: &Card) -> Result<Card, CardServiceError> {
        self.repo.update_card(card)?;
        self.repo
            .get_card(card.uuid)?
            .ok_or(CardServiceError::InconsistentState(
                "updated card not found in read-back",
            ))
    }

    /// Gets one card by stable ID.
    pub fn get_card(&self, id: CardId) -> RepoResult<Option<Card>> {
        self.repo.get_card(id)
    }

    /// Lists cards using filter and pagination options.
    pub fn list_cards(&self, query: &CardListQuery) -> RepoResult<Vec<Card>> {
        self.repo.list_cards(query)
    }

    /// Hard-deletes a card. Inbound relation edges from other cards are
    /// left in place and filtered lazily at read time.
    pub fn delete_card(&self, id: CardId) -> Result<(), CardServiceError> {
        self.repo.delete_card(id)?;
        info!("event=card_delete module=card_service status=ok card={id}");
        Ok(())
    }
}
