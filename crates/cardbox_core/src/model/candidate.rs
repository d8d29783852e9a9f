//! Transient import-candidate read model.
//!
//! Candidates exist only between the analyze and commit phases of an
//! import session; they are never persisted in this shape.

use crate::model::card::{Category, GtdBucket};
use serde::{Deserialize, Serialize};

/// One atomic knowledge unit awaiting user review before commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportCandidate {
    /// Title derived from the unit's leading sentence.
    pub title: String,
    /// Full unit text.
    pub content: String,
    /// Classifier-assigned four-color category.
    pub category: Category,
    /// Heuristic confidence in `[0, 1]`; not a calibrated probability.
    pub confidence: f64,
    /// Tentative category-prefixed address.
    pub address: String,
    /// Workflow bucket derived from `category` via the static table.
    pub gtd_bucket: GtdBucket,
}
