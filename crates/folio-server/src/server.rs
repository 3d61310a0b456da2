use std::sync::Arc;

use folio_gate::Credentials;
use folio_store::FsDocumentStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{Environment, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Folio document server.
pub struct FolioServer {
    config: ServerConfig,
    state: AppState,
}

impl FolioServer {
    /// Open the store root for `env` and load credentials.
    pub fn new(config: ServerConfig, env: Environment) -> ServerResult<Self> {
        let store = FsDocumentStore::open(config.store_root(env))?;
        let credentials = match &config.credentials_path {
            Some(path) => Credentials::load(path)?,
            None => {
                warn!("no credentials file configured; nobody can sign in");
                Credentials::new()
            }
        };
        info!(?env, root = %store.root().display(), users = credentials.len(), "folio server ready");
        Ok(Self::with_state(config, AppState::new(Arc::new(store), credentials)))
    }

    /// Build a server around existing state (useful for testing).
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Serve requests until Ctrl+C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("folio listening on http://{}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
