//! Learning and training writers.
//!
//! `learn` reinforces organically typed words, `train` records a supervised
//! spelling → word pair. Both normalize the word and validate it against the
//! scheme before any store write.

#[cfg(test)]
mod tests;

use tracing::{debug, debug_span};

use crate::error::VarnamError;
use crate::scheme::Scheme;
use crate::settings::settings;
use crate::store::{PatternOrigin, SuggestionStore, WordRecord};
use crate::unicode::normalize;

/// Current UTC time as epoch seconds.
pub fn now_epoch() -> u64 {
    time::OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}

fn prepare(scheme: &dyn Scheme, word: &str) -> Result<String, VarnamError> {
    let word = normalize(word.trim());
    if word.is_empty() {
        return Err(VarnamError::EmptyInput);
    }
    if !scheme.is_known_word(&word) {
        return Err(VarnamError::Validation { word });
    }
    Ok(word)
}

/// Learn `word`: a new word starts at `max(base_confidence, floor)`, a known
/// word gains exactly 1. `learned_on` is refreshed either way.
///
/// Every syllable-aligned prefix of the word is also stored as a plain row
/// (never overwriting an existing one) so the token matcher can reach the
/// word one syllable at a time.
pub fn learn(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    word: &str,
    base_confidence: u32,
) -> Result<WordRecord, VarnamError> {
    let _span = debug_span!("learn", word, base_confidence).entered();
    let word = prepare(scheme, word)?;

    let floor = settings().dictionary.learnt_word_min_confidence;
    let record = store.learn_word(&word, base_confidence.max(floor), now_epoch())?;

    let prefixes = store_prefixes(store, scheme, &word)?;

    debug!(word = %record.word, confidence = record.confidence, prefixes);
    Ok(record)
}

/// Insert every proper syllable-aligned prefix of `word` as a plain row.
fn store_prefixes(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    word: &str,
) -> Result<usize, VarnamError> {
    let units = scheme.syllables(word);
    let count = units.len().saturating_sub(1);
    let mut prefix = String::with_capacity(word.len());
    for unit in units.iter().take(count) {
        prefix.push_str(unit);
        store.insert_word(&prefix)?;
    }
    Ok(count)
}

/// Restore an exported word row: the stored row is raised to at least the
/// record's confidence and timestamp. Learnt words get their prefixes back.
pub fn restore(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    record: &WordRecord,
) -> Result<WordRecord, VarnamError> {
    let word = prepare(scheme, &record.word)?;
    let merged = store.merge_word(&WordRecord {
        word: word.clone(),
        confidence: record.confidence.max(1),
        learned_on: record.learned_on,
    })?;
    if merged.is_learnt() {
        store_prefixes(store, scheme, &word)?;
    }
    Ok(merged)
}

/// Train `pattern` → `word`. The word is inserted with default confidence
/// if absent (an existing row is left untouched) and the pair is stored as
/// a trained pattern.
pub fn train(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    pattern: &str,
    word: &str,
) -> Result<WordRecord, VarnamError> {
    let _span = debug_span!("train", pattern, word).entered();
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(VarnamError::EmptyInput);
    }
    let word = prepare(scheme, word)?;

    let record = store.insert_word(&word)?;
    let added = store.add_pattern(pattern, &word, PatternOrigin::Trained)?;
    debug!(word = %record.word, added);
    Ok(record)
}

/// Remove a word and its patterns. Returns `false` if it was not stored.
pub fn unlearn(store: &dyn SuggestionStore, word: &str) -> Result<bool, VarnamError> {
    let _span = debug_span!("unlearn", word).entered();
    let word = normalize(word.trim());
    if word.is_empty() {
        return Err(VarnamError::EmptyInput);
    }
    let removed = store.delete_word(&word)?;
    debug!(removed);
    Ok(removed)
}
