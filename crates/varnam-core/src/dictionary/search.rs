use tracing::{debug, debug_span};

use super::{rank_unique, Suggestion};
use crate::settings::settings;
use crate::store::{StoreError, SuggestionStore};

/// Search the words relation for literal candidates.
///
/// Exact mode returns rows equal to a candidate. Prefix mode returns learnt
/// rows that strictly extend a non-empty candidate. Results are ranked by
/// confidence (ties by word) and capped at `dictionary.search_limit`.
pub fn search_dictionary<S: AsRef<str>>(
    store: &dyn SuggestionStore,
    candidates: &[S],
    prefix_mode: bool,
) -> Result<Vec<Suggestion>, StoreError> {
    let _span = debug_span!("search_dictionary", n = candidates.len(), prefix_mode).entered();

    let keys: Vec<&str> = candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !c.is_empty())
        .collect();
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let rows = if prefix_mode {
        store.words_with_prefix(&keys, true)?
    } else {
        store.lookup_words(&keys)?
    };

    let mut results = rank_unique(rows.into_iter().map(Suggestion::from).collect());
    results.truncate(settings().dictionary.search_limit);
    debug!(found = results.len());
    Ok(results)
}
