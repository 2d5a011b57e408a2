use std::fs;
use std::path::Path;
use std::process;

use varnam_engine::VarnamError;

use super::open_engine;
use super::word_list::{parse_pairs, parse_words};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn learn(db: &Path, word: &str, confidence: u32) {
    let v = die!(open_engine(db), "Error opening learnings: {}");
    let row = die!(
        v.learn_with_confidence(word, confidence),
        "Error learning {word}: {}"
    );
    println!("Learned: {} (confidence {})", row.word, row.confidence);
}

/// Learn every word in a word list. Words failing validation are reported
/// and skipped; store errors abort.
pub fn learn_file(db: &Path, file: &str) {
    let text = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let v = die!(open_engine(db), "Error opening learnings: {}");
    let (mut learned, mut skipped) = (0usize, 0usize);
    for word in parse_words(&text) {
        match v.learn(&word) {
            Ok(_) => learned += 1,
            Err(e) if e.is_validation() => {
                eprintln!("Skipped {word}: {e}");
                skipped += 1;
            }
            Err(e) => die!(Err::<(), VarnamError>(e), "Error learning {word}: {}"),
        }
    }
    die!(v.checkpoint(), "Error writing checkpoint: {}");
    println!("{learned} learned, {skipped} skipped");
}

pub fn train(db: &Path, pattern: &str, word: &str) {
    let v = die!(open_engine(db), "Error opening learnings: {}");
    let row = die!(v.train(pattern, word), "Error training {pattern}: {}");
    println!("Trained: {pattern} → {}", row.word);
}

pub fn train_file(db: &Path, file: &str) {
    let text = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let pairs = die!(parse_pairs(&text), "Error in {file}: {}");
    let v = die!(open_engine(db), "Error opening learnings: {}");
    let (mut trained, mut skipped) = (0usize, 0usize);
    for (pattern, word) in &pairs {
        match v.train(pattern, word) {
            Ok(_) => trained += 1,
            Err(e) if e.is_validation() => {
                eprintln!("Skipped {pattern} → {word}: {e}");
                skipped += 1;
            }
            Err(e) => die!(Err::<(), VarnamError>(e), "Error training {pattern}: {}"),
        }
    }
    die!(v.checkpoint(), "Error writing checkpoint: {}");
    println!("{trained} trained, {skipped} skipped");
}

pub fn unlearn(db: &Path, word: &str) {
    let v = die!(open_engine(db), "Error opening learnings: {}");
    if die!(v.unlearn(word), "Error unlearning {word}: {}") {
        println!("Removed: {word}");
    } else {
        println!("Not found: {word}");
    }
}
