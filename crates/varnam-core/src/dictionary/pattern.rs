use std::collections::HashSet;

use tracing::{debug, debug_span};

use super::{by_rank, rank_unique, PatternDictionarySuggestion, Suggestion};
use crate::settings::settings;
use crate::store::{StoreError, SuggestionStore, WordRecord};

/// Pattern-sourced confidence: stored value plus the learnt-word floor.
fn boosted(record: WordRecord) -> Suggestion {
    let floor = settings().dictionary.learnt_word_min_confidence;
    Suggestion::new(
        record.word,
        record.confidence.saturating_add(floor),
        record.learned_on,
    )
}

/// Words whose stored pattern starts with `pattern` (equality included).
/// Each word appears once; ranked and capped at `dictionary.pattern_limit`.
pub fn trailing_patterns(
    store: &dyn SuggestionStore,
    pattern: &str,
) -> Result<Vec<Suggestion>, StoreError> {
    let _span = debug_span!("trailing_patterns", pattern).entered();
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let rows = store.patterns_with_prefix(pattern)?;
    let mut results = rank_unique(rows.into_iter().map(|r| boosted(r.word)).collect());
    results.truncate(settings().dictionary.pattern_limit);
    debug!(found = results.len());
    Ok(results)
}

/// Rows whose stored pattern is a prefix of `pattern`, or starts with it.
///
/// Longest stored pattern first, then confidence, then word. Capped at
/// `dictionary.pattern_limit`. Matching is case sensitive.
pub fn resolve_patterns(
    store: &dyn SuggestionStore,
    pattern: &str,
) -> Result<Vec<PatternDictionarySuggestion>, StoreError> {
    let _span = debug_span!("resolve_patterns", pattern).entered();
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = store.patterns_prefixing(pattern)?;
    rows.extend(store.patterns_with_prefix(pattern)?);

    let mut seen = HashSet::new();
    rows.retain(|r| seen.insert((r.pattern.clone(), r.word.word.clone())));

    let mut results: Vec<PatternDictionarySuggestion> = rows
        .into_iter()
        .map(|r| PatternDictionarySuggestion {
            length: r.pattern.chars().count(),
            suggestion: boosted(r.word),
        })
        .collect();
    results.sort_by(|a, b| {
        b.length
            .cmp(&a.length)
            .then_with(|| by_rank(&a.suggestion, &b.suggestion))
    });
    results.truncate(settings().dictionary.pattern_limit);
    debug!(found = results.len(), longest = results.first().map(|r| r.length));
    Ok(results)
}
