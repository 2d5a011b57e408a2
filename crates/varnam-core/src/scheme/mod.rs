//! Scheme tables: Latin input to ambiguous script tokens.
//!
//! The suggestion core only depends on the [`Scheme`] trait. [`SchemeTable`]
//! is the TOML-driven implementation shipped with the crate; it tokenizes
//! greedily by longest pattern match.

mod config;
mod table;

pub use config::{parse_scheme_toml, SchemeConfig, SchemeConfigError};
pub use table::{SchemeTable, DEFAULT_SCHEME_TOML};

/// Kind of a token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Phonetic unit with one or more script possibilities.
    Symbol,
    /// Pass-through literal (unmapped character).
    Other,
}

/// One position in the tokenized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub position: usize,
    pub token_type: TokenType,
    /// Script strings this position may render as, most likely first.
    pub possibilities: Vec<String>,
    /// Input text the token was produced from.
    pub input: String,
}

impl Token {
    pub fn symbol(position: usize, input: impl Into<String>, possibilities: Vec<String>) -> Self {
        Self {
            position,
            token_type: TokenType::Symbol,
            possibilities,
            input: input.into(),
        }
    }

    pub fn other(position: usize, input: impl Into<String>) -> Self {
        let input = input.into();
        Self {
            position,
            token_type: TokenType::Other,
            possibilities: vec![input.clone()],
            input,
        }
    }

    pub fn is_symbol(&self) -> bool {
        self.token_type == TokenType::Symbol
    }

    /// Most likely rendering of this position.
    pub fn first(&self) -> &str {
        self.possibilities.first().map_or("", |p| p.as_str())
    }
}

/// Tokenizer contract consumed by the suggestion core.
pub trait Scheme: Send + Sync {
    /// Language code (e.g. "ml").
    fn language(&self) -> &str;

    /// Tokenize raw Latin input. Positions start at 0 and increase by one.
    fn tokenize(&self, input: &str) -> Vec<Token>;

    /// Whether every character of `word` belongs to the scheme's script.
    fn is_known_word(&self, word: &str) -> bool;

    /// Render `tail` as a continuation of the script word `word`.
    fn continue_word(&self, word: &str, tail: &str) -> String {
        format!("{word}{}", greedy_render(&self.tokenize(tail)))
    }

    /// Split a script word into the units tokens extend words by. Every
    /// prefix made of whole units is a string the matcher may look up.
    fn syllables(&self, word: &str) -> Vec<String> {
        word.chars().map(String::from).collect()
    }
}

/// Concatenate the first possibility of every token.
pub fn greedy_render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::first).collect()
}

/// Cartesian product of token possibilities, in possibility order,
/// truncated to `limit` after every position.
pub fn expand_possibilities(tokens: &[Token], limit: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    for token in tokens {
        let mut next = Vec::with_capacity(limit);
        'outer: for prefix in &words {
            for p in &token.possibilities {
                if next.len() == limit {
                    break 'outer;
                }
                next.push(format!("{prefix}{p}"));
            }
        }
        words = next;
    }
    words.retain(|w| !w.is_empty());
    words
}
