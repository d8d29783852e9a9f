//! Exact-match duplicate detection.
//!
//! # Responsibility
//! - Normalize title/content pairs (trim + casefold).
//! - Detect exact duplicates against a store snapshot.
//!
//! # Invariants
//! - Detection is exact-match only; no similarity scoring.
//! - Both normalized fields must match for a hit.
//! - The snapshot is supplied by the caller, so batch commits can pin the
//!   pre-batch store state and stay blind to intra-batch duplicates.

use crate::model::card::Card;

/// Normalizes one field for duplicate comparison.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Returns the first existing card whose normalized title and content
/// both match the given pair.
pub fn find_duplicate<'a>(title: &str, content: &str, existing: &'a [Card]) -> Option<&'a Card> {
    let title_norm = normalize(title);
    let content_norm = normalize(content);
    existing
        .iter()
        .find(|card| normalize(&card.title) == title_norm && normalize(&card.content) == content_norm)
}

#[cfg(test)]
mod tests {
    use super::{find_duplicate, normalize};
    use crate::model::card::{Card, Category};

    fn sample_store() -> Vec<Card> {
        vec![
            Card::new("Graph Theory", "Nodes and edges.", Category::CoreConcept, "A3"),
            Card::new("Sources", "Primary literature.", Category::Reference, "C8"),
        ]
    }

    #[test]
    fn normalization_trims_and_casefolds() {
        assert_eq!(normalize("  Graph THEORY  "), "graph theory");
    }

    #[test]
    fn both_fields_must_match() {
        let store = sample_store();
        assert!(find_duplicate(" graph theory ", "NODES AND EDGES.", &store).is_some());
        assert!(find_duplicate("Graph Theory", "different body", &store).is_none());
        assert!(find_duplicate("different title", "Nodes and edges.", &store).is_none());
    }

    #[test]
    fn empty_store_has_no_duplicates() {
        assert!(find_duplicate("anything", "at all", &[]).is_none());
    }
}
