use std::sync::Arc;

use folio_gate::Credentials;
use folio_store::DocumentStore;

use crate::session::SessionStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub credentials: Arc<Credentials>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, credentials: Credentials) -> Self {
        Self {
            store,
            credentials: Arc::new(credentials),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
