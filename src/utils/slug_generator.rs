//! Candidate slug generation.
//!
//! Slugs are drawn uniformly, with replacement, from the 62 ASCII
//! alphanumerics. The randomness only has to be well distributed: uniqueness
//! is enforced by the record store, never by the generator.

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use std::sync::LazyLock;

use crate::domain::allocation_policy::MAX_SLUG_LENGTH;

/// Slugs that would shadow a fixed route if they were ever handed out.
const RESERVED_SLUGS: &[&str] = &["health", "shorten", "stats"];

/// Anything the router could have allocated: 1-10 alphanumerics.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").expect("slug regex is valid"));

/// Source of candidate slugs.
#[cfg_attr(test, mockall::automock)]
pub trait SlugGenerator: Send + Sync {
    /// Produces a candidate of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Generator backed by the thread-local PRNG.
///
/// Each worker thread draws from its own generator, so concurrent allocations
/// never contend on shared RNG state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSlugGenerator;

impl SlugGenerator for RandomSlugGenerator {
    fn generate(&self, length: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

/// Returns true if the slug collides with a fixed route.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Returns true if the string has the shape of an allocatable slug.
///
/// Used to answer lookups for impossible slugs without a store round trip.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LENGTH && SLUG_REGEX.is_match(slug)
}
