//! Title resolution with an explicit fuzzy-match policy.
//!
//! Exact (case-insensitive) lookup always wins. When exact lookup fails
//! and fuzzy matching is enabled, titles are scored by normalized edit
//! distance; a match is accepted only at or above `min_confidence`, and
//! equally confident candidates resolve to the lowest record id. Below
//! the threshold a query resolves to nothing — never to the nearest
//! title.

use tracing::debug;

use crate::catalog::{Catalog, RecordId};

/// A resolved title with its match confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMatch {
    /// Matched record.
    pub id: RecordId,
    /// 1.0 for exact matches, otherwise the edit-distance similarity.
    pub confidence: f32,
}

/// Title matcher with a first-class confidence threshold.
///
/// # Examples
///
/// ```
/// use sugerir::catalog::{Catalog, ContentRecord, ContentType, TitleMatcher};
///
/// let catalog = Catalog::from_records(vec![
///     ContentRecord::new(0, "Blade Runner", ContentType::Movie),
/// ]);
///
/// let matcher = TitleMatcher::new();
/// // Exact match, any casing
/// assert_eq!(matcher.resolve(&catalog, "blade runner").unwrap().id, 0);
/// // One typo still clears the default threshold
/// assert_eq!(matcher.resolve(&catalog, "Blade Runer").unwrap().id, 0);
/// // Garbage does not resolve to the nearest title
/// assert!(matcher.resolve(&catalog, "Casablanca").is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TitleMatcher {
    min_confidence: f32,
    fuzzy: bool,
}

/// Default confidence floor for fuzzy matches.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.9;

impl TitleMatcher {
    /// Matcher with fuzzy fallback at the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            fuzzy: true,
        }
    }

    /// Exact-only matcher (no fuzzy fallback).
    #[must_use]
    pub fn exact() -> Self {
        Self {
            min_confidence: 1.0,
            fuzzy: false,
        }
    }

    /// Set the fuzzy confidence floor (clamped to 0..=1).
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    /// Resolve a query title against a catalog.
    #[must_use]
    pub fn resolve(&self, catalog: &Catalog, query: &str) -> Option<TitleMatch> {
        if let Some(id) = catalog.resolve(query) {
            return Some(TitleMatch {
                id,
                confidence: 1.0,
            });
        }
        if !self.fuzzy {
            return None;
        }

        let query_norm = query.trim().to_lowercase();
        let mut best: Option<TitleMatch> = None;

        for record in catalog.records() {
            let candidate = record.title.trim().to_lowercase();
            let confidence = edit_distance_similarity(&query_norm, &candidate);
            if confidence < self.min_confidence {
                continue;
            }
            let better = match best {
                None => true,
                // Tie-break: higher confidence, then lower id
                Some(b) => confidence > b.confidence,
            };
            if better {
                best = Some(TitleMatch {
                    id: record.id,
                    confidence,
                });
            }
        }

        if let Some(m) = best {
            debug!(
                query,
                id = m.id,
                confidence = m.confidence,
                "fuzzy title match"
            );
        }
        best
    }
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // One row of the DP matrix at a time
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (prev[j + 1] + 1).min(current[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b_chars.len()]
}

/// Edit distance normalized into a 0–1 similarity.
fn edit_distance_similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (edit_distance(a, b) as f32 / max_len as f32)
}
