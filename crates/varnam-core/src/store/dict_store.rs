use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, debug_span};

use crate::settings::settings;

use super::wal::{StoreWal, WalOp};
use super::{PatternOrigin, PatternRow, StoreError, SuggestionStore, WordRecord, DEFAULT_CONFIDENCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct WordRow {
    pub(super) confidence: u32,
    pub(super) learned_on: u64,
}

/// The two relations plus a reverse index for cascading deletes.
#[derive(Default)]
pub(super) struct Tables {
    pub(super) words: BTreeMap<String, WordRow>,
    /// pattern → (word → origin)
    pub(super) patterns: BTreeMap<String, BTreeMap<String, PatternOrigin>>,
    /// word → patterns referencing it
    pattern_index: BTreeMap<String, BTreeSet<String>>,
}

impl Tables {
    fn record(word: &str, row: WordRow) -> WordRecord {
        WordRecord {
            word: word.to_string(),
            confidence: row.confidence,
            learned_on: row.learned_on,
        }
    }

    fn pattern_row(&self, pattern: &str, word: &str, origin: PatternOrigin) -> Option<PatternRow> {
        let row = self.words.get(word)?;
        Some(PatternRow {
            pattern: pattern.to_string(),
            word: Self::record(word, *row),
            origin,
        })
    }

    pub(super) fn learn(&mut self, word: &str, initial_confidence: u32, learned_on: u64) -> WordRecord {
        let row = self
            .words
            .entry(word.to_string())
            .and_modify(|row| {
                let bumped = row.confidence.saturating_add(1);
                // A plain row becoming learnt is lifted to the initial confidence
                row.confidence = if row.learned_on == 0 {
                    bumped.max(initial_confidence)
                } else {
                    bumped
                };
                row.learned_on = learned_on;
            })
            .or_insert(WordRow {
                confidence: initial_confidence,
                learned_on,
            });
        Self::record(word, *row)
    }

    pub(super) fn insert(&mut self, word: &str) -> WordRecord {
        let row = self.words.entry(word.to_string()).or_insert(WordRow {
            confidence: DEFAULT_CONFIDENCE,
            learned_on: 0,
        });
        Self::record(word, *row)
    }

    pub(super) fn merge(&mut self, record: &WordRecord) -> WordRecord {
        let row = self
            .words
            .entry(record.word.clone())
            .and_modify(|row| {
                row.confidence = row.confidence.max(record.confidence);
                row.learned_on = row.learned_on.max(record.learned_on);
            })
            .or_insert(WordRow {
                confidence: record.confidence.max(DEFAULT_CONFIDENCE),
                learned_on: record.learned_on,
            });
        Self::record(&record.word, *row)
    }

    pub(super) fn add_pattern(
        &mut self,
        pattern: &str,
        word: &str,
        origin: PatternOrigin,
    ) -> Result<bool, StoreError> {
        if !self.words.contains_key(word) {
            return Err(StoreError::MissingWord(word.to_string()));
        }
        let words = self.patterns.entry(pattern.to_string()).or_default();
        if words.contains_key(word) {
            return Ok(false);
        }
        words.insert(word.to_string(), origin);
        self.pattern_index
            .entry(word.to_string())
            .or_default()
            .insert(pattern.to_string());
        Ok(true)
    }

    pub(super) fn delete(&mut self, word: &str) -> bool {
        if self.words.remove(word).is_none() {
            return false;
        }
        for pattern in self.pattern_index.remove(word).unwrap_or_default() {
            if let Some(words) = self.patterns.get_mut(&pattern) {
                words.remove(word);
                if words.is_empty() {
                    self.patterns.remove(&pattern);
                }
            }
        }
        true
    }

    /// Re-apply a logged operation (WAL replay).
    pub(super) fn apply(&mut self, op: &WalOp) -> Result<(), StoreError> {
        match op {
            WalOp::Learn {
                word,
                initial_confidence,
                learned_on,
            } => {
                self.learn(word, *initial_confidence, *learned_on);
            }
            WalOp::Insert { word } => {
                self.insert(word);
            }
            WalOp::Merge { record } => {
                self.merge(record);
            }
            WalOp::AddPattern {
                pattern,
                word,
                origin,
            } => {
                self.add_pattern(pattern, word, *origin)?;
            }
            WalOp::Delete { word } => {
                self.delete(word);
            }
        }
        Ok(())
    }

    pub(super) fn pattern_count(&self) -> usize {
        self.patterns.values().map(|words| words.len()).sum()
    }
}

struct State {
    tables: Tables,
    wal: Option<StoreWal>,
}

impl State {
    fn log(&mut self, op: &WalOp) -> Result<(), StoreError> {
        if let Some(wal) = self.wal.as_mut() {
            wal.append(op)?;
        }
        Ok(())
    }

    fn maybe_checkpoint(&mut self) -> Result<(), StoreError> {
        if let Some(wal) = self.wal.as_mut() {
            if wal.needs_compact() {
                self.tables.save(wal.checkpoint_path())?;
                wal.truncate_wal()?;
            }
        }
        Ok(())
    }
}

/// Ordered in-memory word/pattern tables.
///
/// Readers share an `RwLock` read guard, so each query sees one snapshot.
/// Every write holds the write guard for the whole log-apply-checkpoint
/// sequence, which makes increment-or-insert atomic.
pub struct DictStore {
    state: RwLock<State>,
}

impl DictStore {
    /// Volatile store, nothing is written to disk.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                tables: Tables::default(),
                wal: None,
            }),
        }
    }

    /// Open a durable store: load the checkpoint (empty if missing) and
    /// replay the write-ahead log next to it.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_compact_threshold(path, settings().store.wal_compact_threshold)
    }

    pub fn open_with_compact_threshold(path: &Path, threshold: usize) -> Result<Self, StoreError> {
        let _span = debug_span!("store_open", path = %path.display()).entered();
        let mut tables = Tables::open(path)?;
        let mut wal = StoreWal::new(path, threshold);
        let replayed = wal.replay(&mut tables)?;
        debug!(
            words = tables.words.len(),
            patterns = tables.pattern_count(),
            replayed
        );
        Ok(Self {
            state: RwLock::new(State {
                tables,
                wal: Some(wal),
            }),
        })
    }

    /// Write the full state and truncate the WAL. No-op for volatile stores.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let State { tables, wal } = &mut *state;
        if let Some(wal) = wal.as_mut() {
            tables.save(wal.checkpoint_path())?;
            wal.truncate_wal()?;
            debug!(words = tables.words.len(), "checkpoint written");
        }
        Ok(())
    }

    /// Checkpoint path of a durable store, `None` for volatile stores.
    pub fn path(&self) -> Result<Option<PathBuf>, StoreError> {
        let state = self.read()?;
        Ok(state.wal.as_ref().map(|w| w.checkpoint_path().to_path_buf()))
    }

    pub fn word_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.tables.words.len())
    }

    pub fn pattern_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.tables.pattern_count())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for DictStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionStore for DictStore {
    fn lookup_words(&self, words: &[&str]) -> Result<Vec<WordRecord>, StoreError> {
        let state = self.read()?;
        let unique: BTreeSet<&str> = words.iter().copied().collect();
        Ok(unique
            .into_iter()
            .filter_map(|w| state.tables.words.get(w).map(|row| Tables::record(w, *row)))
            .collect())
    }

    fn words_with_prefix(
        &self,
        prefixes: &[&str],
        learnt_only: bool,
    ) -> Result<Vec<WordRecord>, StoreError> {
        let state = self.read()?;
        let mut found: BTreeMap<&str, WordRow> = BTreeMap::new();
        for prefix in prefixes.iter().filter(|p| !p.is_empty()) {
            let range = state
                .tables
                .words
                .range::<str, _>((Bound::Excluded(*prefix), Bound::Unbounded));
            for (word, row) in range.take_while(|(w, _)| w.starts_with(prefix)) {
                if learnt_only && row.learned_on == 0 {
                    continue;
                }
                found.insert(word.as_str(), *row);
            }
        }
        Ok(found
            .into_iter()
            .map(|(w, row)| Tables::record(w, row))
            .collect())
    }

    fn patterns_with_prefix(&self, prefix: &str) -> Result<Vec<PatternRow>, StoreError> {
        let state = self.read()?;
        let tables = &state.tables;
        let mut rows = Vec::new();
        let range = tables
            .patterns
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded));
        for (pattern, words) in range.take_while(|(p, _)| p.starts_with(prefix)) {
            rows.extend(
                words
                    .iter()
                    .filter_map(|(w, origin)| tables.pattern_row(pattern, w, *origin)),
            );
        }
        Ok(rows)
    }

    fn patterns_prefixing(&self, text: &str) -> Result<Vec<PatternRow>, StoreError> {
        let state = self.read()?;
        let tables = &state.tables;
        let mut rows = Vec::new();
        // Only split at char boundaries
        for end in text.char_indices().map(|(i, c)| i + c.len_utf8()) {
            let prefix = &text[..end];
            if let Some(words) = tables.patterns.get(prefix) {
                rows.extend(
                    words
                        .iter()
                        .filter_map(|(w, origin)| tables.pattern_row(prefix, w, *origin)),
                );
            }
        }
        Ok(rows)
    }

    fn learn_word(
        &self,
        word: &str,
        initial_confidence: u32,
        learned_on: u64,
    ) -> Result<WordRecord, StoreError> {
        let mut state = self.write()?;
        state.log(&WalOp::Learn {
            word: word.to_string(),
            initial_confidence,
            learned_on,
        })?;
        let record = state.tables.learn(word, initial_confidence, learned_on);
        state.maybe_checkpoint()?;
        Ok(record)
    }

    fn insert_word(&self, word: &str) -> Result<WordRecord, StoreError> {
        let mut state = self.write()?;
        if let Some(row) = state.tables.words.get(word) {
            return Ok(Tables::record(word, *row));
        }
        state.log(&WalOp::Insert {
            word: word.to_string(),
        })?;
        let record = state.tables.insert(word);
        state.maybe_checkpoint()?;
        Ok(record)
    }

    fn merge_word(&self, record: &WordRecord) -> Result<WordRecord, StoreError> {
        let mut state = self.write()?;
        state.log(&WalOp::Merge {
            record: record.clone(),
        })?;
        let merged = state.tables.merge(record);
        state.maybe_checkpoint()?;
        Ok(merged)
    }

    fn add_pattern(
        &self,
        pattern: &str,
        word: &str,
        origin: PatternOrigin,
    ) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if !state.tables.words.contains_key(word) {
            return Err(StoreError::MissingWord(word.to_string()));
        }
        let exists = state
            .tables
            .patterns
            .get(pattern)
            .is_some_and(|words| words.contains_key(word));
        if exists {
            return Ok(false);
        }
        state.log(&WalOp::AddPattern {
            pattern: pattern.to_string(),
            word: word.to_string(),
            origin,
        })?;
        let added = state.tables.add_pattern(pattern, word, origin)?;
        state.maybe_checkpoint()?;
        Ok(added)
    }

    fn delete_word(&self, word: &str) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        if !state.tables.words.contains_key(word) {
            return Ok(false);
        }
        state.log(&WalOp::Delete {
            word: word.to_string(),
        })?;
        let removed = state.tables.delete(word);
        state.maybe_checkpoint()?;
        Ok(removed)
    }

    fn has_patterns(&self, word: &str) -> Result<bool, StoreError> {
        let state = self.read()?;
        Ok(state
            .tables
            .pattern_index
            .get(word)
            .is_some_and(|patterns| !patterns.is_empty()))
    }

    fn all_words(&self) -> Result<Vec<WordRecord>, StoreError> {
        let state = self.read()?;
        Ok(state
            .tables
            .words
            .iter()
            .map(|(w, row)| Tables::record(w, *row))
            .collect())
    }

    fn all_patterns(&self) -> Result<Vec<PatternRow>, StoreError> {
        let state = self.read()?;
        let tables = &state.tables;
        Ok(tables
            .patterns
            .iter()
            .flat_map(|(pattern, words)| {
                words
                    .iter()
                    .filter_map(move |(w, origin)| tables.pattern_row(pattern, w, *origin))
            })
            .collect())
    }
}
