use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::dict_store::{Tables, WordRow};
use super::{PatternOrigin, StoreError};

const MAGIC: &[u8; 4] = b"VRNS";
const VERSION: u8 = 1;

/// Flat serialization format for bincode.
#[derive(Serialize, Deserialize)]
struct StoreData {
    words: Vec<WordEntry>,
    patterns: Vec<PatternEntry>,
}

#[derive(Serialize, Deserialize)]
struct WordEntry {
    word: String,
    confidence: u32,
    learned_on: u64,
}

#[derive(Serialize, Deserialize)]
struct PatternEntry {
    pattern: String,
    word: String,
    origin: PatternOrigin,
}

impl Tables {
    /// Serialize to bytes (VRNS format).
    pub(super) fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let body = bincode::serialize(&self.to_data()).map_err(StoreError::Serialize)?;

        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (VRNS format).
    pub(super) fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < 5 {
            return Err(StoreError::InvalidHeader);
        }
        if &bytes[0..4] != MAGIC {
            return Err(StoreError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(StoreError::UnsupportedVersion(bytes[4]));
        }
        let data: StoreData = bincode::deserialize(&bytes[5..]).map_err(StoreError::Deserialize)?;
        Self::from_data(data)
    }

    /// Atomic write: write to .tmp then rename.
    pub(super) fn save(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Open from file, returning empty tables if the file doesn't exist.
    pub(super) fn open(path: &Path) -> Result<Self, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn to_data(&self) -> StoreData {
        let words = self
            .words
            .iter()
            .map(|(word, row)| WordEntry {
                word: word.clone(),
                confidence: row.confidence,
                learned_on: row.learned_on,
            })
            .collect();

        let mut patterns = Vec::new();
        for (pattern, words) in &self.patterns {
            for (word, origin) in words {
                patterns.push(PatternEntry {
                    pattern: pattern.clone(),
                    word: word.clone(),
                    origin: *origin,
                });
            }
        }

        StoreData { words, patterns }
    }

    fn from_data(data: StoreData) -> Result<Self, StoreError> {
        let mut tables = Self::default();
        for rec in data.words {
            tables.words.insert(
                rec.word,
                WordRow {
                    confidence: rec.confidence,
                    learned_on: rec.learned_on,
                },
            );
        }
        for rec in data.patterns {
            tables.add_pattern(&rec.pattern, &rec.word, rec.origin)?;
        }
        Ok(tables)
    }
}
