//! Suggestion core of the Varnam transliteration engine.
//!
//! Walks ambiguous token sequences against a confidence-weighted word store,
//! resolves multi-word spelling patterns, and records learnt and trained words.

pub mod dictionary;
pub mod error;
pub mod learn;
pub mod scheme;
pub mod settings;
pub mod store;
pub mod unicode;

#[cfg(test)]
pub(crate) mod testutil;

pub use dictionary::{DictionaryResult, PatternDictionarySuggestion, Suggestion};
pub use error::VarnamError;
pub use scheme::{Scheme, SchemeTable, Token, TokenType};
pub use store::{DictStore, StoreError, SuggestionStore};
