use tracing::{debug, debug_span};

use super::search::search_dictionary;
use super::{rank_unique, DictionaryResult, Suggestion};
use crate::scheme::Token;
use crate::store::{StoreError, SuggestionStore};

/// In-flight candidate. Index in the generation list is the branch id;
/// ids are append-only, so a dead branch keeps its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Branch {
    Live(String),
    Dead,
}

/// Walk `tokens` against the words relation, extending every live branch
/// one symbol token at a time.
///
/// The first symbol token seeds one branch per possibility without a
/// lookup. At each later symbol token the first possibility extends the
/// branch in place (a miss kills it) and every other possibility extends
/// the pre-extension string into a new branch if it hits. The hits of the
/// deepest position with any hit are returned.
pub fn match_dictionary(
    store: &dyn SuggestionStore,
    tokens: &[Token],
) -> Result<DictionaryResult, StoreError> {
    let _span = debug_span!("match_dictionary", tokens = tokens.len()).entered();

    let Some(last) = tokens.last() else {
        return Ok(DictionaryResult::default());
    };
    let mut symbols = tokens.iter().filter(|t| t.is_symbol());
    let Some(seed) = symbols.next() else {
        return Ok(DictionaryResult::default());
    };

    let mut branches: Vec<Branch> = seed
        .possibilities
        .iter()
        .map(|p| Branch::Live(p.clone()))
        .collect();
    let mut found: Vec<Suggestion> = Vec::new();
    let mut longest = 0;

    for token in symbols {
        let (next, hits) = advance(store, &branches, token)?;
        branches = next;
        if !hits.is_empty() {
            found = hits;
            longest = token.position;
        }
        if !branches.iter().any(|b| matches!(b, Branch::Live(_))) {
            break;
        }
    }

    let exact_match = !found.is_empty() && longest == last.position;
    let suggestions = rank_unique(found);
    debug!(
        branches = branches.len(),
        found = suggestions.len(),
        longest,
        exact_match
    );
    Ok(DictionaryResult {
        suggestions,
        exact_match,
        longest_match_position: longest,
    })
}

/// Build the next generation of branches for one symbol token.
fn advance(
    store: &dyn SuggestionStore,
    branches: &[Branch],
    token: &Token,
) -> Result<(Vec<Branch>, Vec<Suggestion>), StoreError> {
    let Some((head, rest)) = token.possibilities.split_first() else {
        return Ok((branches.to_vec(), Vec::new()));
    };

    let mut next = Vec::with_capacity(branches.len());
    let mut spawned = Vec::new();
    let mut hits = Vec::new();

    for branch in branches {
        let Branch::Live(word) = branch else {
            next.push(Branch::Dead);
            continue;
        };

        let extended = format!("{word}{head}");
        match lookup(store, &extended)? {
            Some(s) => {
                hits.push(s);
                next.push(Branch::Live(extended));
            }
            None => next.push(Branch::Dead),
        }

        for alt in rest {
            let candidate = format!("{word}{alt}");
            if let Some(s) = lookup(store, &candidate)? {
                hits.push(s);
                spawned.push(Branch::Live(candidate));
            }
        }
    }

    next.extend(spawned);
    Ok((next, hits))
}

fn lookup(store: &dyn SuggestionStore, word: &str) -> Result<Option<Suggestion>, StoreError> {
    Ok(search_dictionary(store, &[word], false)?.into_iter().next())
}

/// Prefix completions for each word; output `i` belongs to input `i`.
pub fn expand(
    store: &dyn SuggestionStore,
    words: &[Suggestion],
) -> Result<Vec<Vec<Suggestion>>, StoreError> {
    let _span = debug_span!("expand", n = words.len()).entered();
    words
        .iter()
        .map(|w| search_dictionary(store, &[w.word.as_str()], true))
        .collect()
}
