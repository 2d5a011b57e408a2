use std::path::Path;
use std::process;

use serde::Serialize;
use varnam_engine::{Suggestion, Varnam};

use super::open_engine;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        die!(serde_json::to_string_pretty(value), "Error encoding JSON: {}")
    );
}

fn print_suggestions(label: &str, suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        return;
    }
    println!("{label}:");
    for (i, s) in suggestions.iter().enumerate() {
        println!("  #{:>2}: {}\t(confidence={})", i + 1, s.word, s.weight);
    }
}

fn engine(db: &Path) -> Varnam {
    die!(open_engine(db), "Error opening learnings: {}")
}

pub fn search(db: &Path, words: &[String], prefix: bool, json: bool) {
    let found = die!(engine(db).search(words, prefix), "Error searching: {}");
    if json {
        print_json(&found);
    } else if found.is_empty() {
        println!("(no matches)");
    } else {
        print_suggestions("matches", &found);
    }
}

pub fn match_input(db: &Path, input: &str, json: bool) {
    let v = engine(db);
    let result = die!(v.match_input(input), "Error matching {input}: {}");
    if json {
        print_json(&result);
        return;
    }
    let tokens: Vec<String> = v
        .tokenize(input)
        .iter()
        .map(|t| format!("{}[{}]", t.input, t.possibilities.join("|")))
        .collect();
    println!("tokens: {}", tokens.join(" "));
    println!(
        "exact_match={} longest_match_position={}",
        result.exact_match, result.longest_match_position
    );
    print_suggestions("suggestions", &result.suggestions);
}

pub fn patterns(db: &Path, input: &str, trailing: bool, json: bool) {
    let v = engine(db);
    if trailing {
        let found = die!(v.trailing_patterns(input), "Error resolving {input}: {}");
        if json {
            print_json(&found);
        } else {
            print_suggestions("trailing", &found);
        }
        return;
    }
    let found = die!(v.resolve_patterns(input), "Error resolving {input}: {}");
    if json {
        print_json(&found);
    } else if found.is_empty() {
        println!("(no patterns)");
    } else {
        for p in &found {
            let (head, _) = input.split_at(
                input
                    .char_indices()
                    .nth(p.length)
                    .map_or(input.len(), |(i, _)| i),
            );
            println!(
                "{head:<12} → {}\t(confidence={})",
                p.suggestion.word, p.suggestion.weight
            );
        }
    }
}

pub fn transliterate(db: &Path, input: &str, json: bool) {
    let t = die!(
        engine(db).transliterate(input),
        "Error transliterating {input}: {}"
    );
    if json {
        print_json(&t);
        return;
    }
    print_suggestions("exact", &t.exact_matches);
    print_suggestions("patterns", &t.pattern_dictionary_suggestions);
    print_suggestions("dictionary", &t.dictionary_suggestions);
    print_suggestions("tokenizer", &t.tokenizer_suggestions);
    print_suggestions("greedy", &t.greedy_tokenized);
}
