//! Core domain logic for Cardbox, a four-color Zettelkasten card manager.
//! This crate is the single source of truth for business invariants:
//! classification, addressing, dedup, the relation graph and the import
//! pipeline.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use engine::address::allocate;
pub use engine::classify::{classify, extract_title, Classification};
pub use engine::dedup::{find_duplicate, normalize};
pub use engine::rng::{RandomSource, SeededRandom, SystemRandom};
pub use engine::segment::{segment, SegmentError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::candidate::ImportCandidate;
pub use model::card::{Card, CardId, CardValidationError, Category, GtdBucket};
pub use repo::card_repo::{
    CardListQuery, CardRepository, RepoError, RepoResult, SqliteCardRepository,
};
pub use service::card_service::{CardService, CardServiceError, CardSuggestion, NewCardRequest};
pub use service::import_service::{CommitReport, ImportError, ImportSession, ImportState};
pub use service::relation_service::{RelationError, RelationService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
