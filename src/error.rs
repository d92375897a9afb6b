//! Error type shared by the cores and browser bindings.
//!
//! Nothing here reaches the page: callers log the error and fall back to the
//! browser's default behavior.

#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("local storage is unavailable")]
    StorageUnavailable,
    #[error("storage read failed for {key}: {reason}")]
    StorageRead { key: String, reason: String },
    #[error("storage write failed for {key}: {reason}")]
    StorageWrite { key: String, reason: String },
    #[error("invalid stored preference: {0:?}")]
    InvalidPreference(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("dom error ({context}): {reason}")]
    Dom { context: &'static str, reason: String },
}

impl EnhanceError {
    pub fn dom(context: &'static str, reason: impl Into<String>) -> Self {
        Self::Dom { context, reason: reason.into() }
    }
}
