//! Category-prefixed address allocation.
//!
//! # Responsibility
//! - Produce human-readable addresses of the form `prefix + 1..=100`.
//! - Accept caller-supplied overrides verbatim when non-empty.
//!
//! # Invariants
//! - Allocation never fails.
//! - No collision check is performed against the store; two cards of the
//!   same category may share an address. The address is a display label,
//!   never a store key.

use crate::engine::rng::RandomSource;
use crate::model::card::Category;

const ADDRESS_SLOT_RANGE: u32 = 100;

/// Allocates an address for `category`.
///
/// A non-blank `override_address` is returned verbatim; otherwise the
/// fixed category prefix is combined with a random slot in `1..=100`.
pub fn allocate(
    category: Category,
    override_address: Option<&str>,
    rng: &mut dyn RandomSource,
) -> String {
    if let Some(value) = override_address {
        if !value.trim().is_empty() {
            return value.to_string();
        }
    }

    let slot = rng.pick(ADDRESS_SLOT_RANGE) + 1;
    format!("{}{slot}", category.address_prefix())
}
