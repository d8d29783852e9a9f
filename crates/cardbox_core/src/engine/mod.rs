//! Pure classification and addressing engine.
//!
//! # Responsibility
//! - Segment raw plaintext into atomic units.
//! - Classify units into the four-color taxonomy with a confidence score.
//! - Allocate category-prefixed addresses.
//! - Detect exact-match duplicates against a store snapshot.
//!
//! # Invariants
//! - Every function here is synchronous, bounded and free of I/O.
//! - All randomness flows through the injected [`rng::RandomSource`], so
//!   behavior is replayable with a seeded source.

pub mod address;
pub mod classify;
pub mod dedup;
pub mod rng;
pub mod segment;
