//! HTTP server for Folio.
//!
//! Lists the documents under the store root, renders markdown to HTML,
//! serves plain text verbatim, and lets a signed-in user create, edit, and
//! delete documents. Every mutating route, plus the new- and edit-form
//! views, is checked by the access gate before the store is touched.

pub mod config;
pub mod error;
pub mod handler;
pub mod markdown;
pub mod router;
pub mod server;
pub mod session;
pub mod state;
pub mod views;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use markdown::render_markdown;
pub use server::FolioServer;
pub use session::{SessionHandle, SessionStore, FLASH_COOKIE, SESSION_COOKIE};
pub use state::AppState;
