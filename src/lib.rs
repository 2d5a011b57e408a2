//! Varnam transliteration engine.
//!
//! [`Varnam`] binds a scheme table to a suggestion store and exposes the
//! dictionary, pattern and learning operations of `varnam_core`, plus
//! full-input transliteration and JSON learnings files.

mod learnings;
mod trace_init;
mod transliterate;
mod varnam;


pub use learnings::{ExportedPattern, ImportSummary, Learnings};
pub use trace_init::init_tracing;
pub use transliterate::TransliterationResult;
pub use varnam::Varnam;

pub use varnam_core::dictionary::{DictionaryResult, PatternDictionarySuggestion, Suggestion};
pub use varnam_core::scheme::{self, Scheme, SchemeTable, Token, TokenType};
pub use varnam_core::settings;
pub use varnam_core::store::{DictStore, StoreError, SuggestionStore, WordRecord};
pub use varnam_core::VarnamError;
