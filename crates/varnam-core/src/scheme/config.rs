use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SchemeConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("scheme has no vowels or no consonants")]
    Empty,
    #[error("pattern '{0}' must be non-empty ASCII")]
    InvalidPattern(String),
    #[error("pattern '{0}' has an empty value")]
    EmptyValue(String),
    #[error("pattern '{0}' is defined more than once")]
    DuplicatePattern(String),
    #[error("virama must be a single character, got '{0}'")]
    InvalidVirama(String),
    #[error("chil key '{0}' must be a single consonant letter")]
    InvalidChil(String),
    #[error("scheme table already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeConfig {
    pub language: LanguageConfig,
    pub vowels: BTreeMap<String, VowelConfig>,
    pub consonants: BTreeMap<String, Vec<String>>,
    /// Consonant letter to its word-final atomic form.
    #[serde(default)]
    pub chils: BTreeMap<String, String>,
    /// Standalone marks (anusvara, visarga, joiners).
    #[serde(default)]
    pub symbols: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    pub code: String,
    pub name: String,
    pub virama: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VowelConfig {
    pub independent: String,
    /// Dependent sign; empty for the inherent vowel.
    #[serde(default)]
    pub sign: String,
}

/// Parse and validate a scheme TOML string.
pub fn parse_scheme_toml(content: &str) -> Result<SchemeConfig, SchemeConfigError> {
    let config: SchemeConfig =
        toml::from_str(content).map_err(|e| SchemeConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl SchemeConfig {
    fn validate(&self) -> Result<(), SchemeConfigError> {
        if self.vowels.is_empty() || self.consonants.is_empty() {
            return Err(SchemeConfigError::Empty);
        }
        if self.language.virama.chars().count() != 1 {
            return Err(SchemeConfigError::InvalidVirama(
                self.language.virama.clone(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        let patterns = self
            .vowels
            .keys()
            .chain(self.consonants.keys())
            .chain(self.symbols.keys());
        for pattern in patterns {
            if pattern.is_empty() || !pattern.is_ascii() {
                return Err(SchemeConfigError::InvalidPattern(pattern.clone()));
            }
            if !seen.insert(pattern.as_str()) {
                return Err(SchemeConfigError::DuplicatePattern(pattern.clone()));
            }
        }

        for (pattern, vowel) in &self.vowels {
            if vowel.independent.is_empty() {
                return Err(SchemeConfigError::EmptyValue(pattern.clone()));
            }
        }
        for (pattern, values) in self.consonants.iter().chain(&self.symbols) {
            if values.is_empty() || values.iter().any(|v| v.is_empty()) {
                return Err(SchemeConfigError::EmptyValue(pattern.clone()));
            }
        }
        for (letter, chil) in &self.chils {
            if letter.chars().count() != 1 {
                return Err(SchemeConfigError::InvalidChil(letter.clone()));
            }
            if chil.is_empty() {
                return Err(SchemeConfigError::EmptyValue(letter.clone()));
            }
        }
        Ok(())
    }
}
