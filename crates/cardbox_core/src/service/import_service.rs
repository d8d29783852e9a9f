//! Two-phase import pipeline.
//!
//! # Responsibility
//! - Drive the `Draft -> Analyzed -> Committed | Cancelled` state machine.
//! - Turn raw plaintext into reviewed candidates via segment + classify +
//!   allocate.
//! - Commit surviving candidates behind the exact-match dedup guard.
//!
//! # Invariants
//! - Nothing is persisted before the `Committed` transition.
//! - Segmentation/parse failures keep the session in `Draft`.
//! - Each candidate is checked against the pre-batch store snapshot;
//!   duplicates within one batch are not cross-checked and may all
//!   commit.
//! - `Committed` and `Cancelled` are terminal.

use crate::engine::address::allocate;
use crate::engine::classify::classify;
use crate::engine::dedup::find_duplicate;
use crate::engine::rng::RandomSource;
use crate::engine::segment::{segment, SegmentError};
use crate::model::candidate::ImportCandidate;
use crate::model::card::Card;
use crate::repo::card_repo::{CardListQuery, CardRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Import pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    /// Raw text input is being assembled or edited.
    Draft,
    /// Candidates are generated and awaiting user review.
    Analyzed,
    /// Terminal: accepted candidates were persisted.
    Committed,
    /// Terminal: the session was abandoned without side effects.
    Cancelled,
}

impl Display for ImportState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Analyzed => "analyzed",
            Self::Committed => "committed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

/// Import pipeline error.
#[derive(Debug)]
pub enum ImportError {
    /// Segmentation produced zero units; the session stays in `Draft`.
    EmptyContent,
    /// The external document parser failed; surfaced as-is.
    Parse(String),
    /// Operation called in the wrong state.
    InvalidState {
        expected: ImportState,
        actual: ImportState,
    },
    /// Persistence-layer failure during commit.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "content produced no non-empty units"),
            Self::Parse(message) => write!(f, "document parse failed: {message}"),
            Self::InvalidState { expected, actual } => write!(
                f,
                "import session is in state `{actual}`; operation requires `{expected}`"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SegmentError> for ImportError {
    fn from(value: SegmentError) -> Self {
        match value {
            SegmentError::EmptyContent => Self::EmptyContent,
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of a batch commit. Skips are counts, not errors: the accepted
/// candidates still commit (partial success).
#[derive(Debug)]
pub struct CommitReport {
    /// Cards persisted by this commit, in candidate order.
    pub accepted: Vec<Card>,
    /// Number of candidates filtered by the dedup guard.
    pub skipped_count: usize,
}

/// One two-phase import flow from raw text to committed cards.
pub struct ImportSession {
    raw_text: String,
    state: ImportState,
    candidates: Vec<ImportCandidate>,
}

impl ImportSession {
    /// Starts an empty session in `Draft`.
    pub fn new() -> Self {
        Self {
            raw_text: String::new(),
            state: ImportState::Draft,
            candidates: Vec::new(),
        }
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Candidates generated by the last analyze; empty outside `Analyzed`.
    pub fn candidates(&self) -> &[ImportCandidate] {
        &self.candidates
    }

    /// Sets the raw text input while drafting.
    pub fn set_raw_text(&mut self, raw_text: impl Into<String>) -> Result<(), ImportError> {
        self.ensure_state(ImportState::Draft)?;
        self.raw_text = raw_text.into();
        Ok(())
    }

    /// Feeds the outcome of the external document parser into the draft.
    ///
    /// A parser failure is surfaced verbatim and the session stays in
    /// `Draft` so the user can retry with a different file.
    pub fn set_parsed_input(
        &mut self,
        parsed: Result<String, String>,
    ) -> Result<(), ImportError> {
        self.ensure_state(ImportState::Draft)?;
        match parsed {
            Ok(text) => {
                self.raw_text = text;
                Ok(())
            }
            Err(message) => Err(ImportError::Parse(message)),
        }
    }

    /// Runs segmenter + classifier + allocator over the draft text.
    ///
    /// On success the session moves to `Analyzed`; on `EmptyContent` it
    /// stays in `Draft` with no candidates.
    pub fn analyze(
        &mut self,
        rng: &mut dyn RandomSource,
    ) -> Result<&[ImportCandidate], ImportError> {
        self.ensure_state(ImportState::Draft)?;

        let units = segment(&self.raw_text)?;
        self.candidates = units
            .into_iter()
            .map(|unit| {
                let classification = classify(&unit, rng);
                let address = allocate(classification.category, None, rng);
                ImportCandidate {
                    title: classification.title,
                    content: unit,
                    category: classification.category,
                    confidence: classification.confidence,
                    address,
                    gtd_bucket: classification.category.gtd_bucket(),
                }
            })
            .collect();
        self.state = ImportState::Analyzed;

        info!(
            "event=import_analyze module=import_service status=ok candidates={}",
            self.candidates.len()
        );
        Ok(&self.candidates)
    }

    /// Returns to editing, discarding generated candidates.
    pub fn back_to_draft(&mut self) -> Result<(), ImportError> {
        self.ensure_state(ImportState::Analyzed)?;
        self.candidates.clear();
        self.state = ImportState::Draft;
        Ok(())
    }

    /// Drops one candidate during review (the presentation layer's
    /// per-candidate reject control). Returns `None` when the index is
    /// out of range or the session is not in `Analyzed`.
    pub fn discard_candidate(&mut self, index: usize) -> Option<ImportCandidate> {
        if self.state != ImportState::Analyzed || index >= self.candidates.len() {
            return None;
        }
        Some(self.candidates.remove(index))
    }

    /// Abandons the session. Valid from `Draft` and `Analyzed`; nothing
    /// was persisted before `Committed`, so there are no side effects.
    pub fn cancel(&mut self) -> Result<(), ImportError> {
        match self.state {
            ImportState::Draft | ImportState::Analyzed => {
                self.candidates.clear();
                self.state = ImportState::Cancelled;
                Ok(())
            }
            actual => Err(ImportError::InvalidState {
                expected: ImportState::Analyzed,
                actual,
            }),
        }
    }

    /// Commits reviewed candidates into the store.
    ///
    /// Every candidate is checked against the store snapshot taken before
    /// the batch; survivors are inserted and reported in order. The
    /// session ends in `Committed`.
    pub fn commit<R: CardRepository>(&mut self, repo: &R) -> Result<CommitReport, ImportError> {
        self.ensure_state(ImportState::Analyzed)?;

        let snapshot = repo.list_cards(&CardListQuery::default())?;
        let mut accepted = Vec::new();
        let mut skipped_count = 0usize;

        for candidate in &self.candidates {
            if find_duplicate(&candidate.title, &candidate.content, &snapshot).is_some() {
                skipped_count += 1;
                continue;
            }

            let card = Card::new(
                candidate.title.clone(),
                candidate.content.clone(),
                candidate.category,
                candidate.address.clone(),
            );
            let id = repo.create_card(&card)?;
            let stored = repo
                .get_card(id)?
                .ok_or(RepoError::NotFound(id))
                .map_err(ImportError::Repo)?;
            accepted.push(stored);
        }

        self.state = ImportState::Committed;
        info!(
            "event=import_commit module=import_service status=ok accepted={} skipped={}",
            accepted.len(),
            skipped_count
        );

        Ok(CommitReport {
            accepted,
            skipped_count,
        })
    }

    fn ensure_state(&self, expected: ImportState) -> Result<(), ImportError> {
        if self.state != expected {
            return Err(ImportError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new()
    }
}
