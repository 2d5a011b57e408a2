use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use varnam_core::dictionary::{self, DictionaryResult, PatternDictionarySuggestion, Suggestion};
use varnam_core::learn;
use varnam_core::scheme::{Scheme, SchemeTable, Token};
use varnam_core::store::{DictStore, WordRecord};
use varnam_core::VarnamError;

use crate::learnings::{self, ImportSummary, Learnings};
use crate::transliterate::{self, TransliterationResult};

/// A scheme bound to a suggestion store.
///
/// Cheap to clone; clones share the store. All operations are synchronous
/// and safe to call from several threads.
#[derive(Clone)]
pub struct Varnam {
    store: Arc<DictStore>,
    scheme: Arc<dyn Scheme>,
}

impl Varnam {
    pub fn new(store: Arc<DictStore>, scheme: Arc<dyn Scheme>) -> Self {
        Self { store, scheme }
    }

    /// Open (or create) a learnings file with the global scheme table.
    pub fn open(path: &Path) -> Result<Self, VarnamError> {
        let store = DictStore::open(path)?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(SchemeTable::global().clone()),
        ))
    }

    /// Non-persistent engine with the global scheme table.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(DictStore::new()),
            Arc::new(SchemeTable::global().clone()),
        )
    }

    pub fn store(&self) -> &DictStore {
        &self.store
    }

    pub fn scheme(&self) -> &dyn Scheme {
        self.scheme.as_ref()
    }

    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        self.scheme.tokenize(input)
    }

    // --- lookups ---

    pub fn search<S: AsRef<str>>(
        &self,
        candidates: &[S],
        prefix_mode: bool,
    ) -> Result<Vec<Suggestion>, VarnamError> {
        Ok(dictionary::search_dictionary(
            self.store.as_ref(),
            candidates,
            prefix_mode,
        )?)
    }

    pub fn match_tokens(&self, tokens: &[Token]) -> Result<DictionaryResult, VarnamError> {
        Ok(dictionary::match_dictionary(self.store.as_ref(), tokens)?)
    }

    /// Tokenize `input` and walk the tokens against the dictionary.
    pub fn match_input(&self, input: &str) -> Result<DictionaryResult, VarnamError> {
        self.match_tokens(&self.tokenize(input))
    }

    pub fn expand(&self, words: &[Suggestion]) -> Result<Vec<Vec<Suggestion>>, VarnamError> {
        Ok(dictionary::expand(self.store.as_ref(), words)?)
    }

    pub fn trailing_patterns(&self, pattern: &str) -> Result<Vec<Suggestion>, VarnamError> {
        Ok(dictionary::trailing_patterns(self.store.as_ref(), pattern)?)
    }

    pub fn resolve_patterns(
        &self,
        pattern: &str,
    ) -> Result<Vec<PatternDictionarySuggestion>, VarnamError> {
        Ok(dictionary::resolve_patterns(self.store.as_ref(), pattern)?)
    }

    pub fn transliterate(&self, input: &str) -> Result<TransliterationResult, VarnamError> {
        transliterate::transliterate(self.store.as_ref(), self.scheme.as_ref(), input)
    }

    // --- writes ---

    pub fn learn(&self, word: &str) -> Result<WordRecord, VarnamError> {
        self.learn_with_confidence(word, 0)
    }

    pub fn learn_with_confidence(
        &self,
        word: &str,
        base_confidence: u32,
    ) -> Result<WordRecord, VarnamError> {
        learn::learn(
            self.store.as_ref(),
            self.scheme.as_ref(),
            word,
            base_confidence,
        )
    }

    pub fn train(&self, pattern: &str, word: &str) -> Result<WordRecord, VarnamError> {
        learn::train(self.store.as_ref(), self.scheme.as_ref(), pattern, word)
    }

    pub fn unlearn(&self, word: &str) -> Result<bool, VarnamError> {
        learn::unlearn(self.store.as_ref(), word)
    }

    // --- learnings files ---

    pub fn export_learnings<W: Write>(&self, writer: W) -> Result<Learnings, VarnamError> {
        learnings::export(self.store.as_ref(), self.scheme.as_ref(), writer)
    }

    pub fn import_learnings<R: Read>(&self, reader: R) -> Result<ImportSummary, VarnamError> {
        learnings::import(self.store.as_ref(), self.scheme.as_ref(), reader)
    }

    /// Write a full checkpoint of a file-backed store. No-op in memory.
    pub fn checkpoint(&self) -> Result<(), VarnamError> {
        Ok(self.store.checkpoint()?)
    }
}
