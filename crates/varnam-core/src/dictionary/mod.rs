//! Dictionary lookups over a [`SuggestionStore`](crate::store::SuggestionStore).
//!
//! - `search_dictionary`: exact or prefix search over literal candidates
//! - `match_dictionary`: incremental walk over ambiguous tokens
//! - `expand`: prefix completions for each found word
//! - `trailing_patterns` / `resolve_patterns`: pattern index queries

mod matcher;
mod pattern;
mod search;

pub use matcher::{expand, match_dictionary};
pub use pattern::{resolve_patterns, trailing_patterns};
pub use search::search_dictionary;

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::store::WordRecord;

/// A ranked candidate word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    /// Confidence; `0` when not meaningful.
    pub weight: u32,
    /// Epoch seconds of the last learn, `0` if never learnt.
    pub learned_on: u64,
}

impl Suggestion {
    pub fn new(word: impl Into<String>, weight: u32, learned_on: u64) -> Self {
        Self {
            word: word.into(),
            weight,
            learned_on,
        }
    }
}

impl From<WordRecord> for Suggestion {
    fn from(r: WordRecord) -> Self {
        Self {
            word: r.word,
            weight: r.confidence,
            learned_on: r.learned_on,
        }
    }
}

/// Outcome of [`match_dictionary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryResult {
    /// Words found at the deepest matched position, ranked.
    pub suggestions: Vec<Suggestion>,
    /// The deepest matched position is the last token's position.
    pub exact_match: bool,
    /// Deepest position with at least one hit, `0` if none.
    pub longest_match_position: usize,
}

/// A pattern-sourced suggestion with the char length of its stored pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDictionarySuggestion {
    pub suggestion: Suggestion,
    pub length: usize,
}

/// Confidence descending, then word ascending.
pub fn by_rank(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.weight.cmp(&a.weight).then_with(|| a.word.cmp(&b.word))
}

/// Sort by rank and keep the first occurrence of each word.
pub fn rank_unique(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(by_rank);
    let mut seen = HashSet::new();
    suggestions.retain(|s| seen.insert(s.word.clone()));
    suggestions
}
