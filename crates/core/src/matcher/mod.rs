//! Fuzzy title matching against indexed records.
//!
//! Titles are normalized (lowercase, ASCII alphanumerics and spaces only,
//! collapsed whitespace) and compared with a Dice coefficient over character
//! bigrams.

use std::collections::HashMap;

use crate::records::Record;

/// Default minimum score for a record to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// A record together with its match score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: Record,
    /// Similarity in [0.0, 1.0].
    pub score: f64,
}

/// Normalize a title for comparison.
pub fn normalize(title: &str) -> String {
    let filtered: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Dice coefficient over character bigrams, ignoring spaces.
///
/// Symmetric; equal inputs score 1.0, inputs without a shared bigram score 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}

/// Score a record against an already-normalized target title.
pub fn score_record(normalized_target: &str, record: &Record) -> f64 {
    let by_name = similarity(normalized_target, &normalize(&record.display_name));
    let by_file = similarity(normalized_target, &normalize(&record.file_name));
    by_name.max(by_file)
}

/// Rank records by similarity to `title`.
///
/// Keeps records scoring at least `threshold` (inclusive), best first. Ties
/// keep their input order. A title that normalizes to nothing matches nothing.
pub fn rank(title: &str, records: &[Record], threshold: f64) -> Vec<ScoredRecord> {
    let target = normalize(title);
    if target.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredRecord> = records
        .iter()
        .map(|record| ScoredRecord {
            score: score_record(&target, record),
            record: record.clone(),
        })
        .filter(|s| s.score >= threshold)
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Best matching record, if any clears the threshold.
pub fn best_match(title: &str, records: &[Record], threshold: f64) -> Option<ScoredRecord> {
    rank(title, records, threshold).into_iter().next()
}
