//! Domain model for four-color knowledge cards.
//!
//! # Responsibility
//! - Define the canonical card record and its classification taxonomy.
//! - Define the transient import-candidate shape used during preview.
//!
//! # Invariants
//! - Every persisted card is identified by a stable `CardId`.
//! - `Category` is a closed set of exactly four values.
//! - A card never lists its own id among its related cards.

pub mod candidate;
pub mod card;
