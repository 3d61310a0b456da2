//! Access gate for Folio.
//!
//! Decides whether the caller behind a session may perform a mutating
//! action. Reads (listing, viewing, raw fetch) are never gated; creating,
//! editing, and deleting documents, along with the new- and edit-form views,
//! always pass through [`require_authenticated`] before touching the store.
//!
//! The gate holds no state of its own. The caller's [`Session`] and the
//! loaded [`Credentials`] are passed into every call.
//!
//! # Session lifecycle
//!
//! ```text
//! SignedOut --authenticate + sign_in--> SignedIn --sign_out--> SignedOut
//! ```
//!
//! Sessions do not expire on their own.

pub mod action;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod session;

pub use action::Action;
pub use credentials::Credentials;
pub use error::{GateError, GateResult};
pub use gate::{
    authenticate, authorize, is_authenticated, require_authenticated, sign_in, sign_out,
    GateDecision, DENY_REDIRECT, SIGN_IN_REQUIRED,
};
pub use session::Session;
