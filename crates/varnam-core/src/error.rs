use crate::store::StoreError;

/// Errors surfaced by the public suggestion and learning operations.
#[derive(Debug, thiserror::Error)]
pub enum VarnamError {
    /// The word contains symbols the active scheme cannot produce.
    #[error("word contains symbols outside the scheme: {word}")]
    Validation { word: String },

    #[error("empty input")]
    EmptyInput,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VarnamError {
    /// Whether the caller can recover by correcting its input.
    pub fn is_validation(&self) -> bool {
        matches!(self, VarnamError::Validation { .. } | VarnamError::EmptyInput)
    }
}
