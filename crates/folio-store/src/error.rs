/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with this name exists.
    #[error("{name} does not exist")]
    NotFound { name: String },

    /// The name is empty or would not stay inside the store root.
    #[error("invalid document name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The name's extension maps to no known document kind.
    #[error("unsupported document kind: {name}")]
    UnsupportedKind { name: String },

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
