//! Word and pattern storage.
//!
//! `SuggestionStore` is the query contract the search and learning code is
//! written against. `DictStore` implements it with ordered in-memory tables
//! behind an `RwLock`, optionally backed by a checkpoint file plus a
//! write-ahead log.

mod dict_store;
mod persistence;
mod wal;

pub use dict_store::DictStore;

use std::io;

use serde::{Deserialize, Serialize};

/// Confidence given to words inserted without an explicit value.
pub const DEFAULT_CONFIDENCE: u32 = 1;

/// Unified error type for store queries, writes and file I/O.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected VRNS)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("pattern references unknown word: {0}")]
    MissingWord(String),
}

/// One row of the words relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub confidence: u32,
    /// Epoch seconds of the last learn, `0` if the word was never learnt.
    pub learned_on: u64,
}

impl WordRecord {
    pub fn is_learnt(&self) -> bool {
        self.learned_on > 0
    }
}

/// How a pattern row came to exist (the `learned` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternOrigin {
    /// Supervised `train` call (`learned = 0`).
    Trained,
    /// Derived while learning a word (`learned = 1`).
    Learned,
}

/// One row of the patterns relation joined with the word it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRow {
    pub pattern: String,
    pub word: WordRecord,
    pub origin: PatternOrigin,
}

/// Query contract over the words and patterns relations.
///
/// Reads must observe a consistent snapshot per call. Writes to the same
/// word must be serialized so that `learn_word` never loses an increment.
/// Result order is unspecified; ranking happens in the callers.
pub trait SuggestionStore: Send + Sync {
    /// Rows whose word equals one of `words`.
    fn lookup_words(&self, words: &[&str]) -> Result<Vec<WordRecord>, StoreError>;

    /// Rows whose word strictly extends one of `prefixes`. Each row is
    /// returned at most once. With `learnt_only`, rows with `learned_on == 0`
    /// are skipped.
    fn words_with_prefix(
        &self,
        prefixes: &[&str],
        learnt_only: bool,
    ) -> Result<Vec<WordRecord>, StoreError>;

    /// Pattern rows whose pattern starts with `prefix` (equality included).
    fn patterns_with_prefix(&self, prefix: &str) -> Result<Vec<PatternRow>, StoreError>;

    /// Pattern rows whose pattern is a prefix of `text` (equality included).
    fn patterns_prefixing(&self, text: &str) -> Result<Vec<PatternRow>, StoreError>;

    /// Increment-or-insert: an existing learnt word gains exactly 1
    /// confidence, a new word starts at `initial_confidence`, and a plain
    /// (never learnt) row gains 1 but no less than `initial_confidence`.
    /// All refresh `learned_on`.
    fn learn_word(
        &self,
        word: &str,
        initial_confidence: u32,
        learned_on: u64,
    ) -> Result<WordRecord, StoreError>;

    /// Insert `word` with default confidence and no learn timestamp unless it
    /// already exists. Returns the stored row.
    fn insert_word(&self, word: &str) -> Result<WordRecord, StoreError>;

    /// Insert or raise a word to at least the given confidence and timestamp.
    fn merge_word(&self, record: &WordRecord) -> Result<WordRecord, StoreError>;

    /// Add a `(pattern, word)` row. Returns `false` if the pair already
    /// exists. Fails with [`StoreError::MissingWord`] if `word` is absent.
    fn add_pattern(
        &self,
        pattern: &str,
        word: &str,
        origin: PatternOrigin,
    ) -> Result<bool, StoreError>;

    /// Delete a word and every pattern referencing it.
    fn delete_word(&self, word: &str) -> Result<bool, StoreError>;

    /// Whether any pattern row references `word`.
    fn has_patterns(&self, word: &str) -> Result<bool, StoreError>;

    /// Every word row, ordered by word.
    fn all_words(&self) -> Result<Vec<WordRecord>, StoreError>;

    /// Every pattern row, ordered by (pattern, word).
    fn all_patterns(&self) -> Result<Vec<PatternRow>, StoreError>;
}
