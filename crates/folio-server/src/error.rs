use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_store::StoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gate(#[from] folio_gate::GateError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Status code for errors that reach the client unhandled.
    ///
    /// Handlers turn `NotFound` and `Unauthenticated` into a redirect with a
    /// flash message themselves; the codes here cover everything else.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::InvalidName { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(StoreError::UnsupportedKind { .. }) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Gate(folio_gate::GateError::Unauthenticated { .. }) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
            return (status, "Something went wrong.").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
