//! JSON export/import of learnt words and trained patterns.

use std::collections::HashSet;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};
use varnam_core::learn::restore;
use varnam_core::scheme::Scheme;
use varnam_core::store::{PatternOrigin, WordRecord};
use varnam_core::{SuggestionStore, VarnamError};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learnings {
    pub version: u32,
    pub language: String,
    pub words: Vec<WordRecord>,
    pub patterns: Vec<ExportedPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPattern {
    pub pattern: String,
    pub word: String,
    /// `false` for trained patterns.
    pub learned: bool,
}

/// Counts reported by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub words: usize,
    pub patterns: usize,
    pub skipped: usize,
}

fn invalid_data(e: serde_json::Error) -> VarnamError {
    VarnamError::Io(io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Snapshot learnt words, words referenced by patterns, and all patterns.
/// Syllable prefix rows are left out; import recreates them.
pub(crate) fn collect(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
) -> Result<Learnings, VarnamError> {
    let patterns = store.all_patterns()?;
    let targets: HashSet<&str> = patterns.iter().map(|p| p.word.word.as_str()).collect();
    let words = store
        .all_words()?
        .into_iter()
        .filter(|w| w.is_learnt() || targets.contains(w.word.as_str()))
        .collect();
    let patterns = patterns
        .iter()
        .map(|p| ExportedPattern {
            pattern: p.pattern.clone(),
            word: p.word.word.clone(),
            learned: p.origin == PatternOrigin::Learned,
        })
        .collect();
    Ok(Learnings {
        version: FORMAT_VERSION,
        language: scheme.language().to_string(),
        words,
        patterns,
    })
}

pub(crate) fn export<W: Write>(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    writer: W,
) -> Result<Learnings, VarnamError> {
    let _span = debug_span!("export_learnings").entered();
    let learnings = collect(store, scheme)?;
    serde_json::to_writer_pretty(writer, &learnings).map_err(invalid_data)?;
    debug!(
        words = learnings.words.len(),
        patterns = learnings.patterns.len()
    );
    Ok(learnings)
}

/// Merge learnings into the store. Words that fail validation are skipped,
/// along with patterns pointing at them.
pub(crate) fn import<R: Read>(
    store: &dyn SuggestionStore,
    scheme: &dyn Scheme,
    reader: R,
) -> Result<ImportSummary, VarnamError> {
    let _span = debug_span!("import_learnings").entered();
    let learnings: Learnings = serde_json::from_reader(reader).map_err(invalid_data)?;
    if learnings.version != FORMAT_VERSION {
        return Err(VarnamError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported learnings version: {}", learnings.version),
        )));
    }

    let mut summary = ImportSummary::default();
    let mut imported = HashSet::new();
    for record in &learnings.words {
        match restore(store, scheme, record) {
            Ok(row) => {
                imported.insert(row.word);
                summary.words += 1;
            }
            Err(e) if e.is_validation() => summary.skipped += 1,
            Err(e) => return Err(e),
        }
    }

    for p in &learnings.patterns {
        let word = varnam_core::unicode::normalize(&p.word);
        if p.pattern.is_empty() || !imported.contains(&word) {
            summary.skipped += 1;
            continue;
        }
        let origin = if p.learned {
            PatternOrigin::Learned
        } else {
            PatternOrigin::Trained
        };
        if store.add_pattern(&p.pattern, &word, origin)? {
            summary.patterns += 1;
        }
    }

    debug!(
        words = summary.words,
        patterns = summary.patterns,
        skipped = summary.skipped
    );
    Ok(summary)
}
