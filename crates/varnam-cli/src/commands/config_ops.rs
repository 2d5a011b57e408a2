use std::fs;
use std::process;

use varnam_engine::{scheme, settings};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn scheme_export() {
    print!("{}", scheme::DEFAULT_SCHEME_TOML);
}

pub fn scheme_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let config = die!(scheme::parse_scheme_toml(&content), "Error: {}");
    println!(
        "OK: {} ({}), {} vowels, {} consonants, {} chils",
        config.language.name,
        config.language.code,
        config.vowels.len(),
        config.consonants.len(),
        config.chils.len()
    );
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: dictionary.search_limit={}, dictionary.pattern_limit={}, dictionary.learnt_word_min_confidence={}",
        s.dictionary.search_limit, s.dictionary.pattern_limit, s.dictionary.learnt_word_min_confidence
    );
}
