use std::path::PathBuf;

use crate::action::Action;

/// Errors raised by the access gate.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A guarded action was attempted without a signed-in user. The caller
    /// should be sent to `redirect_to` with `message` shown.
    #[error("{message}")]
    Unauthenticated {
        action: Action,
        message: String,
        redirect_to: String,
    },

    /// The credential file is not valid TOML or has the wrong shape.
    #[error("invalid credentials file {path}: {reason}")]
    CredentialsParse { path: PathBuf, reason: String },

    /// I/O error while reading the credential file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for gate operations.
pub type GateResult<T> = Result<T, GateError>;
