use super::*;
use crate::dictionary::{resolve_patterns, search_dictionary, trailing_patterns};
use crate::scheme::SchemeTable;
use crate::store::DictStore;
use crate::testutil::{words, AsciiScheme};

fn floor() -> u32 {
    settings().dictionary.learnt_word_min_confidence
}

fn record(store: &DictStore, word: &str) -> Option<WordRecord> {
    store.lookup_words(&[word]).unwrap().into_iter().next()
}

// --- learn ---

#[test]
fn test_learn_apple_scenario() {
    let store = DictStore::new();

    let first = learn(&store, &AsciiScheme, "apple", 0).unwrap();
    assert_eq!(first.confidence, floor());
    assert!(first.learned_on > 0);

    let second = learn(&store, &AsciiScheme, "apple", 0).unwrap();
    assert_eq!(second.confidence, floor() + 1);
    assert!(second.learned_on >= first.learned_on);

    let found = search_dictionary(&store, &["apple"], false).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].word, "apple");
    assert_eq!(found[0].weight, floor() + 1);
}

#[test]
fn test_learn_base_above_floor() {
    let store = DictStore::new();
    let r = learn(&store, &AsciiScheme, "pear", floor() + 20).unwrap();
    assert_eq!(r.confidence, floor() + 20);
    // Relearn ignores the base.
    let r = learn(&store, &AsciiScheme, "pear", 1000).unwrap();
    assert_eq!(r.confidence, floor() + 21);
}

#[test]
fn test_learn_timestamp_in_window() {
    let store = DictStore::new();
    learn(&store, &AsciiScheme, "kiwi", 0).unwrap();
    let before = now_epoch();
    let r = learn(&store, &AsciiScheme, "kiwi", 0).unwrap();
    let after = now_epoch();
    assert!(r.learned_on >= before && r.learned_on <= after);
}

#[test]
fn test_learn_leaves_other_words() {
    let store = DictStore::new();
    learn(&store, &AsciiScheme, "plum", 0).unwrap();
    learn(&store, &AsciiScheme, "fig", 0).unwrap();
    learn(&store, &AsciiScheme, "fig", 0).unwrap();
    assert_eq!(record(&store, "plum").unwrap().confidence, floor());
    assert_eq!(record(&store, "fig").unwrap().confidence, floor() + 1);
}

#[test]
fn test_learn_stores_prefixes_as_plain_rows() {
    let store = DictStore::new();
    learn(&store, &AsciiScheme, "abc", 0).unwrap();

    let a = record(&store, "a").unwrap();
    assert_eq!(a.confidence, 1);
    assert!(!a.is_learnt());
    assert!(!record(&store, "ab").unwrap().is_learnt());

    // Prefix rows never surface as completions.
    let completions = search_dictionary(&store, &["a"], true).unwrap();
    assert_eq!(words(&completions), vec!["abc"]);
}

#[test]
fn test_learn_prefix_keeps_existing_learnt_row() {
    let store = DictStore::new();
    let ab = learn(&store, &AsciiScheme, "ab", 0).unwrap();
    learn(&store, &AsciiScheme, "abc", 0).unwrap();
    assert_eq!(record(&store, "ab").unwrap(), ab);
}

#[test]
fn test_learn_prefix_row_gets_floor() {
    let store = DictStore::new();
    learn(&store, &AsciiScheme, "ab", 0).unwrap();
    assert_eq!(record(&store, "a").unwrap().confidence, 1);

    let r = learn(&store, &AsciiScheme, "a", 0).unwrap();
    assert_eq!(r.confidence, floor());
    assert!(r.is_learnt());

    let r = learn(&store, &AsciiScheme, "a", 0).unwrap();
    assert_eq!(r.confidence, floor() + 1);
}

#[test]
fn test_learn_trained_word_gets_floor() {
    let store = DictStore::new();
    train(&store, &AsciiScheme, "xyz", "college").unwrap();
    let r = learn(&store, &AsciiScheme, "college", 0).unwrap();
    assert_eq!(r.confidence, floor());
}

#[test]
fn test_learn_rejects_unknown_symbols() {
    let store = DictStore::new();
    let err = learn(&store, &AsciiScheme, "app1e", 0).unwrap_err();
    assert!(matches!(err, VarnamError::Validation { ref word } if word == "app1e"));
    assert!(err.is_validation());
    assert_eq!(store.word_count().unwrap(), 0);
}

#[test]
fn test_learn_empty() {
    let store = DictStore::new();
    assert!(matches!(
        learn(&store, &AsciiScheme, "   ", 0),
        Err(VarnamError::EmptyInput)
    ));
}

#[test]
fn test_learn_malayalam_normalizes_legacy_chil() {
    let store = DictStore::new();
    let scheme = SchemeTable::global();
    // പ്രൊഫസര്‍ written with a ZWJ chil
    let legacy = "\u{0D2A}\u{0D4D}\u{0D30}\u{0D4A}\u{0D2B}\u{0D38}\u{0D30}\u{0D4D}\u{200D}";
    let atomic = "\u{0D2A}\u{0D4D}\u{0D30}\u{0D4A}\u{0D2B}\u{0D38}\u{0D7C}";

    let r = learn(&store, scheme, legacy, 0).unwrap();
    assert_eq!(r.word, atomic);
    let r = learn(&store, scheme, atomic, 0).unwrap();
    assert_eq!(r.confidence, floor() + 1);
}

#[test]
fn test_learn_malayalam_rejects_latin() {
    let store = DictStore::new();
    let err = learn(&store, SchemeTable::global(), "malayalam", 0).unwrap_err();
    assert!(err.is_validation());
}

// --- train ---

#[test]
fn test_train_college_scenario() {
    let store = DictStore::new();
    train(&store, &AsciiScheme, "college", "Y").unwrap();

    assert!(search_dictionary(&store, &["college"], false)
        .unwrap()
        .is_empty());

    let resolved = resolve_patterns(&store, "collegeil").unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].suggestion.word, "Y");
    assert_eq!(resolved[0].length, 7);
}

#[test]
fn test_train_india_round_trip() {
    let store = DictStore::new();
    train(&store, &AsciiScheme, "india", "X").unwrap();

    let resolved = resolve_patterns(&store, "indiayil").unwrap();
    assert_eq!(resolved[0].suggestion.word, "X");
    assert_eq!(resolved[0].length, 5);
    assert_eq!(resolved[0].suggestion.weight, 1 + floor());

    let trailing = trailing_patterns(&store, "india").unwrap();
    assert_eq!(words(&trailing), vec!["X"]);
}

#[test]
fn test_train_inserts_plain_row() {
    let store = DictStore::new();
    let r = train(&store, &AsciiScheme, "india", "X").unwrap();
    assert_eq!(r.confidence, 1);
    assert_eq!(r.learned_on, 0);
}

#[test]
fn test_train_leaves_learnt_word_untouched() {
    let store = DictStore::new();
    let learnt = learn(&store, &AsciiScheme, "Z", 0).unwrap();
    let r = train(&store, &AsciiScheme, "zed", "Z").unwrap();
    assert_eq!(r, learnt);
    assert_eq!(record(&store, "Z").unwrap(), learnt);
}

#[test]
fn test_train_twice_is_one_pattern() {
    let store = DictStore::new();
    train(&store, &AsciiScheme, "india", "X").unwrap();
    train(&store, &AsciiScheme, "india", "X").unwrap();
    assert_eq!(store.pattern_count().unwrap(), 1);
}

#[test]
fn test_train_validation_no_mutation() {
    let store = DictStore::new();
    let err = train(&store, &AsciiScheme, "india", "X1").unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.word_count().unwrap(), 0);
    assert_eq!(store.pattern_count().unwrap(), 0);
}

#[test]
fn test_train_empty_pattern() {
    let store = DictStore::new();
    assert!(matches!(
        train(&store, &AsciiScheme, "", "X"),
        Err(VarnamError::EmptyInput)
    ));
}

#[test]
fn test_train_normalizes_output_word() {
    let store = DictStore::new();
    let legacy = "\u{0D15}\u{0D3E}\u{0D30}\u{0D4D}\u{200D}";
    let atomic = "\u{0D15}\u{0D3E}\u{0D7C}";
    let r = train(&store, SchemeTable::global(), "kaar", legacy).unwrap();
    assert_eq!(r.word, atomic);
    let resolved = resolve_patterns(&store, "kaar").unwrap();
    assert_eq!(resolved[0].suggestion.word, atomic);
}

// --- unlearn ---

#[test]
fn test_unlearn_cascades_patterns() {
    let store = DictStore::new();
    train(&store, &AsciiScheme, "india", "X").unwrap();
    assert!(unlearn(&store, "X").unwrap());
    assert!(resolve_patterns(&store, "india").unwrap().is_empty());
    assert!(!unlearn(&store, "X").unwrap());
}

#[test]
fn test_unlearn_empty() {
    let store = DictStore::new();
    assert!(matches!(unlearn(&store, ""), Err(VarnamError::EmptyInput)));
}

// --- restore ---

#[test]
fn test_restore_learnt_word_with_prefixes() {
    let store = DictStore::new();
    let r = restore(
        &store,
        &AsciiScheme,
        &WordRecord {
            word: "abc".into(),
            confidence: 42,
            learned_on: 1_700_000_000,
        },
    )
    .unwrap();
    assert_eq!(r.confidence, 42);
    assert_eq!(r.learned_on, 1_700_000_000);
    assert!(!record(&store, "ab").unwrap().is_learnt());
}

#[test]
fn test_restore_never_lowers_existing_row() {
    let store = DictStore::new();
    let learnt = learn(&store, &AsciiScheme, "abc", 0).unwrap();
    let r = restore(
        &store,
        &AsciiScheme,
        &WordRecord {
            word: "abc".into(),
            confidence: 1,
            learned_on: 5,
        },
    )
    .unwrap();
    assert_eq!(r, learnt);
}

#[test]
fn test_restore_trained_word_skips_prefixes() {
    let store = DictStore::new();
    restore(
        &store,
        &AsciiScheme,
        &WordRecord {
            word: "xy".into(),
            confidence: 1,
            learned_on: 0,
        },
    )
    .unwrap();
    assert!(record(&store, "x").is_none());
}

#[test]
fn test_restore_validates() {
    let store = DictStore::new();
    let err = restore(
        &store,
        &AsciiScheme,
        &WordRecord {
            word: "x-y".into(),
            confidence: 3,
            learned_on: 3,
        },
    )
    .unwrap_err();
    assert!(err.is_validation());
}
