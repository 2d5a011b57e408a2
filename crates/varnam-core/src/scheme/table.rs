use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use tracing::debug;

use super::config::{parse_scheme_toml, SchemeConfig, SchemeConfigError};
use super::{Scheme, Token};
use crate::unicode::{ZWJ, ZWNJ};

pub const DEFAULT_SCHEME_TOML: &str = include_str!("default_scheme.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Debug, Clone)]
enum Entry {
    Vowel { independent: String, sign: String },
    Consonant { letters: Vec<String> },
    /// Consonant followed by a vowel sign (generated).
    Syllable { letters: Vec<String>, sign: String },
    Standalone { values: Vec<String> },
}

/// Scheme loaded from TOML: longest-match tokenizer plus script metadata.
#[derive(Debug, Clone)]
pub struct SchemeTable {
    code: String,
    name: String,
    virama: char,
    entries: HashMap<String, Entry>,
    /// Longest pattern length in bytes (patterns are ASCII).
    max_pattern_len: usize,
    chils: HashMap<String, String>,
    repertoire: HashSet<char>,
    /// Vowel signs and virama: characters that attach to the preceding letter.
    marks: HashSet<char>,
}

impl SchemeTable {
    /// Set custom scheme TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), SchemeConfigError> {
        parse_scheme_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| SchemeConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global scheme table.
    pub fn global() -> &'static SchemeTable {
        static INSTANCE: OnceLock<SchemeTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_SCHEME_TOML);
            SchemeTable::from_toml(toml_str).expect("scheme TOML must be valid")
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, SchemeConfigError> {
        Ok(Self::from_config(&parse_scheme_toml(content)?))
    }

    pub fn from_config(config: &SchemeConfig) -> Self {
        let virama = config.language.virama.chars().next().unwrap_or('\u{0D4D}');
        let mut entries = HashMap::new();

        for (pattern, vowel) in &config.vowels {
            entries.insert(
                pattern.clone(),
                Entry::Vowel {
                    independent: vowel.independent.clone(),
                    sign: vowel.sign.clone(),
                },
            );
        }
        for (pattern, letters) in &config.consonants {
            entries.insert(
                pattern.clone(),
                Entry::Consonant {
                    letters: letters.clone(),
                },
            );
        }
        for (pattern, values) in &config.symbols {
            entries.insert(
                pattern.clone(),
                Entry::Standalone {
                    values: values.clone(),
                },
            );
        }
        // Explicit patterns win over generated syllables.
        let mut generated = 0;
        for (c_pattern, letters) in &config.consonants {
            for (v_pattern, vowel) in &config.vowels {
                let pattern = format!("{c_pattern}{v_pattern}");
                if entries.contains_key(&pattern) {
                    continue;
                }
                entries.insert(
                    pattern,
                    Entry::Syllable {
                        letters: letters.clone(),
                        sign: vowel.sign.clone(),
                    },
                );
                generated += 1;
            }
        }

        let max_pattern_len = entries.keys().map(String::len).max().unwrap_or(1);

        let mut marks: HashSet<char> = config.vowels.values().flat_map(|v| v.sign.chars()).collect();
        marks.insert(virama);

        let mut repertoire: HashSet<char> = marks.clone();
        repertoire.extend([ZWJ, ZWNJ]);
        for vowel in config.vowels.values() {
            repertoire.extend(vowel.independent.chars());
        }
        for value in config
            .consonants
            .values()
            .chain(config.symbols.values())
            .flatten()
        {
            repertoire.extend(value.chars());
        }
        for (letter, chil) in &config.chils {
            repertoire.extend(letter.chars());
            repertoire.extend(chil.chars());
        }

        debug!(
            code = %config.language.code,
            patterns = entries.len(),
            generated,
            "scheme table built"
        );

        Self {
            code: config.language.code.clone(),
            name: config.language.name.clone(),
            virama,
            entries,
            max_pattern_len,
            chils: config.chils.clone().into_iter().collect(),
            repertoire,
            marks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn virama(&self) -> char {
        self.virama
    }

    /// Every explicit and generated pattern with its possibilities, sorted
    /// by pattern. Vowels list their independent form.
    pub fn patterns(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(pattern, entry)| (pattern.clone(), self.render(entry, false, false)))
            .collect()
    }

    /// Tokenize `input` as if it directly followed a consonant: a leading
    /// vowel renders as its sign.
    pub fn tokenize_continuation(&self, input: &str) -> Vec<Token> {
        self.tokenize_from(input, true)
    }

    fn tokenize_from(&self, input: &str, after_consonant: bool) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut start = 0;
        while start < input.len() {
            let position = tokens.len();
            match self.longest_match(input, start) {
                Some((end, entry)) => {
                    let word_final = input[end..]
                        .chars()
                        .next()
                        .map_or(true, |c| !c.is_ascii_alphabetic());
                    let leading = position == 0 && after_consonant;
                    tokens.push(Token::symbol(
                        position,
                        &input[start..end],
                        self.render(entry, word_final, leading),
                    ));
                    start = end;
                }
                None => {
                    let len = input[start..].chars().next().map_or(1, char::len_utf8);
                    tokens.push(Token::other(position, &input[start..start + len]));
                    start += len;
                }
            }
        }
        tokens
    }

    fn longest_match(&self, input: &str, start: usize) -> Option<(usize, &Entry)> {
        let rest = &input[start..];
        let max = rest.len().min(self.max_pattern_len);
        (1..=max).rev().find_map(|len| {
            let candidate = rest.get(..len)?;
            self.entries.get(candidate).map(|e| (start + len, e))
        })
    }

    fn render(&self, entry: &Entry, word_final: bool, after_consonant: bool) -> Vec<String> {
        match entry {
            Entry::Vowel { independent, sign } => {
                if after_consonant {
                    vec![sign.clone()]
                } else {
                    vec![independent.clone()]
                }
            }
            Entry::Syllable { letters, sign } => {
                letters.iter().map(|l| format!("{l}{sign}")).collect()
            }
            Entry::Consonant { letters } => {
                let mut out = Vec::with_capacity(letters.len() * 2);
                if word_final {
                    out.extend(letters.iter().filter_map(|l| self.chils.get(l).cloned()));
                }
                out.extend(letters.iter().map(|l| format!("{l}{}", self.virama)));
                out
            }
            Entry::Standalone { values } => values.clone(),
        }
    }

    fn starts_with_vowel(&self, input: &str) -> bool {
        matches!(self.longest_match(input, 0), Some((_, Entry::Vowel { .. })))
    }
}

impl Scheme for SchemeTable {
    fn language(&self) -> &str {
        &self.code
    }

    fn tokenize(&self, input: &str) -> Vec<Token> {
        self.tokenize_from(input, false)
    }

    fn is_known_word(&self, word: &str) -> bool {
        !word.is_empty() && word.chars().all(|c| self.repertoire.contains(&c))
    }

    /// A word ending in a virama continued by a vowel drops the virama and
    /// takes the vowel sign: "ജ്" + "i" renders "ജി".
    fn continue_word(&self, word: &str, tail: &str) -> String {
        if let Some(stem) = word.strip_suffix(self.virama) {
            if self.starts_with_vowel(tail) {
                let rest: String = self
                    .tokenize_continuation(tail)
                    .iter()
                    .map(Token::first)
                    .collect();
                return format!("{stem}{rest}");
            }
        }
        let rest: String = self.tokenize(tail).iter().map(Token::first).collect();
        format!("{word}{rest}")
    }

    /// Letters with their trailing signs and joiners; conjuncts split after
    /// each virama so units line up with token boundaries.
    fn syllables(&self, word: &str) -> Vec<String> {
        let mut units: Vec<String> = Vec::new();
        for c in word.chars() {
            let attach = self.marks.contains(&c) || c == ZWJ || c == ZWNJ;
            match units.last_mut() {
                Some(last) if attach => last.push(c),
                _ => units.push(c.to_string()),
            }
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> &'static SchemeTable {
        SchemeTable::global()
    }

    fn firsts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::first).collect()
    }

    #[test]
    fn test_global_is_malayalam() {
        assert_eq!(table().language(), "ml");
        assert_eq!(table().name(), "Malayalam");
        assert_eq!(table().virama(), '\u{0D4D}');
    }

    #[test]
    fn test_tokenize_syllables() {
        let tokens = table().tokenize("malayaaLaM");
        let inputs: Vec<&str> = tokens.iter().map(|t| t.input.as_str()).collect();
        assert_eq!(inputs, vec!["ma", "la", "yaa", "La", "M"]);
        assert_eq!(tokens[1].possibilities, vec!["ല", "ള"]);
        assert_eq!(firsts(&tokens).concat(), "മലയാളം");
        for (i, t) in tokens.iter().enumerate() {
            assert_eq!(t.position, i);
            assert!(t.is_symbol());
        }
    }

    #[test]
    fn test_final_consonant_prefers_chil() {
        let tokens = table().tokenize("avan");
        let last = tokens.last().unwrap();
        assert_eq!(last.input, "n");
        assert_eq!(last.possibilities, vec!["ൻ", "ൺ", "ന്", "ണ്"]);
    }

    #[test]
    fn test_inner_consonant_takes_virama() {
        let tokens = table().tokenize("india");
        let inputs: Vec<&str> = tokens.iter().map(|t| t.input.as_str()).collect();
        assert_eq!(inputs, vec!["i", "n", "di", "a"]);
        assert_eq!(tokens[1].possibilities, vec!["ന്", "ണ്"]);
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        let tokens = table().tokenize("ka1");
        assert_eq!(tokens.len(), 2);
        assert!(!tokens[1].is_symbol());
        assert_eq!(tokens[1].possibilities, vec!["1"]);
    }

    #[test]
    fn test_consonant_before_punctuation_is_final() {
        let tokens = table().tokenize("avan.");
        assert_eq!(tokens[2].possibilities[0], "ൻ");
        assert!(!tokens[3].is_symbol());
    }

    #[test]
    fn test_tokenize_continuation_uses_sign() {
        let tokens = table().tokenize_continuation("il");
        assert_eq!(tokens[0].possibilities, vec!["ി"]);
        assert_eq!(tokens[1].possibilities[0], "ൽ");
    }

    #[test]
    fn test_continue_word_after_virama() {
        // കോളേജ് + "il"
        let word = "\u{0D15}\u{0D4B}\u{0D33}\u{0D47}\u{0D1C}\u{0D4D}";
        assert_eq!(
            table().continue_word(word, "il"),
            "\u{0D15}\u{0D4B}\u{0D33}\u{0D47}\u{0D1C}\u{0D3F}\u{0D7D}"
        );
    }

    #[test]
    fn test_continue_word_after_vowel() {
        // ഇന്ത്യ + "yil"
        let word = "\u{0D07}\u{0D28}\u{0D4D}\u{0D24}\u{0D4D}\u{0D2F}";
        assert_eq!(
            table().continue_word(word, "yil"),
            format!("{word}\u{0D2F}\u{0D3F}\u{0D7D}")
        );
    }

    #[test]
    fn test_continue_word_virama_then_consonant() {
        let word = "\u{0D1C}\u{0D4D}";
        assert_eq!(table().continue_word(word, "ma"), "\u{0D1C}\u{0D4D}\u{0D2E}");
    }

    #[test]
    fn test_is_known_word() {
        assert!(table().is_known_word("മലയാളം"));
        assert!(table().is_known_word("\u{0D2A}\u{0D4D}\u{0D30}\u{0D4A}\u{0D2B}\u{0D38}\u{0D7C}"));
        assert!(!table().is_known_word("apple"));
        assert!(!table().is_known_word("മലയാളംx"));
        assert!(!table().is_known_word(""));
    }

    #[test]
    fn test_syllables_split_after_virama() {
        // ഇന്ദി -> ഇ | ന് | ദി
        let units = table().syllables("\u{0D07}\u{0D28}\u{0D4D}\u{0D26}\u{0D3F}");
        assert_eq!(units, vec!["\u{0D07}", "\u{0D28}\u{0D4D}", "\u{0D26}\u{0D3F}"]);
    }

    #[test]
    fn test_syllables_anusvara_is_own_unit() {
        let units = table().syllables("മലയാളം");
        assert_eq!(units, vec!["മ", "ല", "യാ", "ള", "ം"]);
    }

    #[test]
    fn test_multi_letter_consonant_syllable() {
        let tokens = table().tokenize("nga");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].possibilities[0], "ങ");
    }

    #[test]
    fn test_patterns_listing() {
        let patterns = table().patterns();
        assert_eq!(patterns["ka"], vec!["ക"]);
        assert_eq!(patterns["i"], vec!["ഇ"]);
        assert!(patterns.contains_key("M"));
    }

    #[test]
    fn test_from_toml_error() {
        assert!(matches!(
            SchemeTable::from_toml("[language]\n"),
            Err(SchemeConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_init_custom_after_global() {
        let _ = SchemeTable::global();
        assert!(matches!(
            SchemeTable::init_custom(DEFAULT_SCHEME_TOML.to_string()),
            Err(SchemeConfigError::AlreadyInitialized)
        ));
    }
}
