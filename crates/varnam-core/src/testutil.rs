//! Shared fixtures for unit tests.

use crate::scheme::{Scheme, Token};
use crate::store::{DictStore, SuggestionStore};

/// Scheme over lowercase ASCII letters: each letter may render as itself or
/// its uppercase form. Anything else passes through.
pub struct AsciiScheme;

impl Scheme for AsciiScheme {
    fn language(&self) -> &str {
        "test"
    }

    fn tokenize(&self, input: &str) -> Vec<Token> {
        input
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if c.is_ascii_lowercase() {
                    sym(i, &[&c.to_string(), &c.to_ascii_uppercase().to_string()])
                } else {
                    Token::other(i, c.to_string())
                }
            })
            .collect()
    }

    fn is_known_word(&self, word: &str) -> bool {
        !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
    }
}

pub fn sym(position: usize, possibilities: &[&str]) -> Token {
    Token::symbol(
        position,
        possibilities.first().copied().unwrap_or_default(),
        possibilities.iter().map(|p| p.to_string()).collect(),
    )
}

pub fn other(position: usize, text: &str) -> Token {
    Token::other(position, text)
}

/// In-memory store holding `words` as plain (non-learnt) rows.
pub fn store_with(words: &[&str]) -> DictStore {
    let store = DictStore::new();
    for w in words {
        store.insert_word(w).unwrap();
    }
    store
}

pub fn words(suggestions: &[crate::Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.word.as_str()).collect()
}
