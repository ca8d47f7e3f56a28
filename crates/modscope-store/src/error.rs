use crate::key::DataKey;

/// Errors from scoped data operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The value could not be serialized to JSON.
    #[error("failed to encode JSON for {key}: {source}")]
    Encode {
        key: DataKey,
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes exist but are not valid JSON for the requested type.
    #[error("failed to decode JSON for {key}: {source}")]
    Decode {
        key: DataKey,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage backend failed for a non-I/O reason.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` if this is a decode failure of stored data.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
