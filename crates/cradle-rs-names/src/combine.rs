//! Name combiner: blends two names into candidate new names.

use crate::error::{NamesError, require_name};
use log::debug;
use std::collections::HashSet;

/// Shortest combined name kept, in characters.
pub const MIN_COMBINED_LEN: usize = 3;
/// Longest combined name kept, in characters.
pub const MAX_COMBINED_LEN: usize = 12;

/// Generate combined-name candidates from two names.
///
/// Candidates come from a fixed set of blends (halves, two-letter prefixes,
/// initials). Only 3 to 12 character results are kept, duplicates are
/// removed, and each result is capitalized.
pub fn combine_names(first: &str, second: &str) -> Result<Vec<String>, NamesError> {
    let first: Vec<char> = require_name(first, "first")?.chars().collect();
    let second: Vec<char> = require_name(second, "second")?.chars().collect();

    let first_half = collect(&first[..first.len().div_ceil(2)]);
    let second_half = collect(&second[second.len() / 2..]);
    let first_all = collect(&first);
    let second_all = collect(&second);

    let candidates = [
        format!("{first_half}{second_half}"),
        format!("{second_half}{first_half}"),
        format!("{}{}", prefix(&first, 2), second_all.to_lowercase()),
        format!("{}{}", prefix(&second, 2), first_all.to_lowercase()),
        format!("{first_all}{}", prefix(&second, 2).to_lowercase()),
        format!("{}{}", prefix(&second, 2), suffix(&first, 2)),
        format!("{}{second_all}", prefix(&first, 1)),
        format!("{}{first_all}", prefix(&second, 1)),
    ];

    let mut seen = HashSet::new();
    let mut emitted = HashSet::new();
    let mut combinations = Vec::new();
    for candidate in candidates {
        let len = candidate.chars().count();
        if !(MIN_COMBINED_LEN..=MAX_COMBINED_LEN).contains(&len) {
            continue;
        }
        if !seen.insert(candidate.clone()) {
            continue;
        }
        let capitalized = capitalize(&candidate);
        // Distinct candidates can collapse to one spelling once capitalized.
        if emitted.insert(capitalized.clone()) {
            combinations.push(capitalized);
        }
    }
    debug!(
        "combined names (first_len={}, second_len={}, results={})",
        first.len(),
        second.len(),
        combinations.len()
    );
    Ok(combinations)
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(head) => head
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn prefix(chars: &[char], count: usize) -> String {
    collect(&chars[..count.min(chars.len())])
}

fn suffix(chars: &[char], count: usize) -> String {
    collect(&chars[chars.len().saturating_sub(count)..])
}
