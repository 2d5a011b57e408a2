use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, debug_span};
use varnam_core::dictionary::{expand, match_dictionary, rank_unique, resolve_patterns};
use varnam_core::scheme::{expand_possibilities, greedy_render, Scheme};
use varnam_core::settings::settings;
use varnam_core::{Suggestion, SuggestionStore, Token, VarnamError};

/// Every suggestion list produced for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransliterationResult {
    /// Words spanning the whole input.
    pub exact_matches: Vec<Suggestion>,
    /// Partial dictionary matches rendered with the rest of the input, and
    /// learnt completions.
    pub dictionary_suggestions: Vec<Suggestion>,
    /// Words reached through trained patterns.
    pub pattern_dictionary_suggestions: Vec<Suggestion>,
    /// Token possibility combinations, most likely first.
    pub tokenizer_suggestions: Vec<Suggestion>,
    /// First possibility of every token.
    pub greedy_tokenized: Vec<Suggestion>,
}

impl TransliterationResult {
    /// All suggestions in display order, each word once.
    pub fn ranked(&self) -> Vec<Suggestion> {
        let mut seen = HashSet::new();
        self.exact_matches
            .iter()
            .chain(&self.pattern_dictionary_suggestions)
            .chain(&self.dictionary_suggestions)
            .chain(&self.tokenizer_suggestions)
            .filter(|s| seen.insert(s.word.clone()))
            .cloned()
            .collect()
    }
}

/// Input text of the tokens after `position`, for rendering a tail.
fn tail_input(tokens: &[Token], position: usize) -> String {
    tokens
        .iter()
        .filter(|t| t.position > position)
        .map(|t| t.input.as_str())
        .collect()
}

pub(crate) fn transliterate(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    input: &str,
) -> Result<TransliterationResult, VarnamError> {
    let _span = debug_span!("transliterate", input).entered();
    let input = input.trim();
    if input.is_empty() {
        return Err(VarnamError::EmptyInput);
    }

    let tokens = scheme.tokenize(input);
    let mut result = TransliterationResult::default();

    let greedy = greedy_render(&tokens);
    if !greedy.is_empty() {
        result.greedy_tokenized.push(Suggestion::new(greedy, 0, 0));
    }
    result.tokenizer_suggestions = expand_possibilities(
        &tokens,
        settings().transliterate.max_tokenizer_suggestions,
    )
    .into_iter()
    .map(|w| Suggestion::new(w, 0, 0))
    .collect();

    let matched = match_dictionary(store, &tokens)?;
    let completions: Vec<Suggestion> = expand(store, &matched.suggestions)?
        .into_iter()
        .flatten()
        .collect();
    if matched.exact_match {
        // Syllable prefix rows are not words on their own
        for s in matched.suggestions {
            if s.learned_on > 0 || store.has_patterns(&s.word)? {
                result.exact_matches.push(s);
            }
        }
        result.dictionary_suggestions = completions;
    } else if !matched.suggestions.is_empty() {
        let tail = tail_input(&tokens, matched.longest_match_position);
        let mut partial: Vec<Suggestion> = matched
            .suggestions
            .into_iter()
            .map(|s| Suggestion {
                word: scheme.continue_word(&s.word, &tail),
                ..s
            })
            .collect();
        partial.extend(completions);
        result.dictionary_suggestions = partial;
    }

    let input_len = input.chars().count();
    for found in resolve_patterns(store, input)? {
        let mut s = found.suggestion;
        if found.length == input_len {
            result.exact_matches.push(s);
        } else if found.length < input_len {
            let tail: String = input.chars().skip(found.length).collect();
            s.word = scheme.continue_word(&s.word, &tail);
            result.pattern_dictionary_suggestions.push(s);
        } else {
            result.pattern_dictionary_suggestions.push(s);
        }
    }

    result.exact_matches = rank_unique(result.exact_matches);
    // Keep resolution order: the longest stored pattern comes first
    let mut seen = HashSet::new();
    result
        .pattern_dictionary_suggestions
        .retain(|s| seen.insert(s.word.clone()));
    let exact = &result.exact_matches;
    result.dictionary_suggestions = rank_unique(result.dictionary_suggestions)
        .into_iter()
        .filter(|s| !exact.iter().any(|e| e.word == s.word))
        .collect();

    debug!(
        exact = result.exact_matches.len(),
        dictionary = result.dictionary_suggestions.len(),
        patterns = result.pattern_dictionary_suggestions.len(),
        tokenizer = result.tokenizer_suggestions.len()
    );
    Ok(result)
}
