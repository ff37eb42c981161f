//! Sibling name compatibility scoring.

use crate::error::{NamesError, require_name};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Overall compatibility band for a pair of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CompatibilityTier {
    /// Map an overall score to its tier.
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::Excellent,
            75..=84 => Self::Good,
            65..=74 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Fixed sentence shown next to the score.
    pub fn description(self) -> &'static str {
        match self {
            Self::Excellent => "These names flow beautifully together and make a lovely sibling set.",
            Self::Good => "These names sound good together with a pleasant balance.",
            Self::Fair => "These names work together, though they share a few similarities.",
            Self::Poor => "These names may clash a little when said side by side.",
        }
    }
}

impl fmt::Display for CompatibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Individual sub-scores behind an overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompatibilityBreakdown {
    /// Distinct first sounds score higher.
    pub phonetic: u8,
    /// Similar lengths score higher.
    pub length: u8,
    /// Similar vowel density scores higher.
    pub vowel_balance: u8,
    /// Similar syllable counts score higher.
    pub syllable_flow: u8,
}

impl CompatibilityBreakdown {
    fn mean(&self) -> f64 {
        let total = u32::from(self.phonetic)
            + u32::from(self.length)
            + u32::from(self.vowel_balance)
            + u32::from(self.syllable_flow);
        f64::from(total) / 4.0
    }
}

/// Compatibility result for two names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityReport {
    /// Rounded mean of the sub-scores, 0 to 100.
    pub score: u8,
    /// Tier derived from `score`.
    pub tier: CompatibilityTier,
    /// The tier's fixed description.
    pub description: &'static str,
    pub breakdown: CompatibilityBreakdown,
}

/// Score how well two sibling names go together.
pub fn score_compatibility(first: &str, second: &str) -> Result<CompatibilityReport, NamesError> {
    let first = require_name(first, "first")?;
    let second = require_name(second, "second")?;

    let breakdown = CompatibilityBreakdown {
        phonetic: phonetic_score(first, second),
        length: length_score(first, second),
        vowel_balance: vowel_balance_score(first, second),
        syllable_flow: syllable_flow_score(first, second),
    };
    let score = breakdown.mean().round() as u8;
    let tier = CompatibilityTier::from_score(score);
    debug!(
        "scored compatibility (score={}, tier={}, phonetic={}, length={}, vowel={}, syllable={})",
        score,
        tier,
        breakdown.phonetic,
        breakdown.length,
        breakdown.vowel_balance,
        breakdown.syllable_flow
    );
    Ok(CompatibilityReport {
        score,
        tier,
        description: tier.description(),
        breakdown,
    })
}

fn phonetic_score(first: &str, second: &str) -> u8 {
    let initial = |name: &str| name.chars().next().map(|c| c.to_lowercase().collect::<String>());
    if initial(first) == initial(second) {
        60
    } else {
        90
    }
}

fn length_score(first: &str, second: &str) -> u8 {
    match first.chars().count().abs_diff(second.chars().count()) {
        0..=2 => 90,
        3..=4 => 75,
        _ => 60,
    }
}

fn vowel_balance_score(first: &str, second: &str) -> u8 {
    let diff = (vowel_ratio(first) - vowel_ratio(second)).abs();
    if diff < 0.2 {
        85
    } else if diff < 0.4 {
        70
    } else {
        60
    }
}

/// Syllable flow in the 60..90 range from estimated syllable counts.
fn syllable_flow_score(first: &str, second: &str) -> u8 {
    match estimate_syllables(first).abs_diff(estimate_syllables(second)) {
        0 => 85,
        1 => 80,
        2 => 70,
        _ => 60,
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn vowel_ratio(name: &str) -> f64 {
    let len = name.chars().count();
    if len == 0 {
        return 0.0;
    }
    let vowels = name.chars().filter(|c| is_vowel(*c)).count();
    vowels as f64 / len as f64
}

/// Estimate syllables as vowel clusters, ignoring a lone trailing `e`.
pub fn estimate_syllables(name: &str) -> usize {
    let chars: Vec<char> = name.chars().map(|c| c.to_ascii_lowercase()).collect();
    let is_nucleus = |c: char| is_vowel(c) || c == 'y';
    let mut clusters = 0;
    let mut in_cluster = false;
    for &c in &chars {
        let nucleus = is_nucleus(c);
        if nucleus && !in_cluster {
            clusters += 1;
        }
        in_cluster = nucleus;
    }
    let silent_e = match chars.as_slice() {
        [.., before, 'e'] => !is_nucleus(*before),
        _ => false,
    };
    if silent_e && clusters > 1 {
        clusters -= 1;
    }
    clusters.max(1)
}
