//! Name derivation tools for Cradle.
//!
//! Pure functions behind the site's calculators: name combinations, sibling
//! compatibility and birth-date zodiac signs. None of them perform IO.

pub mod combine;
pub mod compat;
pub mod error;
pub mod zodiac;

/// Name combination generator.
pub use combine::{MAX_COMBINED_LEN, MIN_COMBINED_LEN, capitalize, combine_names};
/// Sibling compatibility scoring.
pub use compat::{
    CompatibilityBreakdown, CompatibilityReport, CompatibilityTier, estimate_syllables,
    score_compatibility,
};
/// Error type for invalid inputs.
pub use error::NamesError;
/// Zodiac resolution and example names.
pub use zodiac::{Gender, ZodiacName, ZodiacSign, modeled_zodiac_sign, zodiac_sign};
