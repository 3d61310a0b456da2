use folio_crypto::PasswordHasher;
use tracing::{debug, warn};

use crate::action::Action;
use crate::credentials::Credentials;
use crate::error::{GateError, GateResult};
use crate::session::Session;

/// Message shown to a caller who hits a guarded route while signed out.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";

/// Where a denied caller is sent: the document list.
pub const DENY_REDIRECT: &str = "/";

/// Outcome of checking a session against a guarded route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// The route may proceed.
    Allow,
    /// The route must not touch the store. Redirect with the message.
    Deny { message: String, redirect_to: String },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// True iff the session carries a non-empty user identifier.
pub fn is_authenticated(session: &Session) -> bool {
    session.user_id().is_some_and(|user| !user.is_empty())
}

/// Allow signed-in sessions, deny everything else.
pub fn require_authenticated(session: &Session) -> GateDecision {
    if is_authenticated(session) {
        GateDecision::Allow
    } else {
        GateDecision::Deny {
            message: SIGN_IN_REQUIRED.to_string(),
            redirect_to: DENY_REDIRECT.to_string(),
        }
    }
}

/// [`require_authenticated`] for a specific action, as a `Result`.
///
/// Denials are logged with the action that was attempted.
pub fn authorize(session: &Session, action: Action) -> GateResult<()> {
    match require_authenticated(session) {
        GateDecision::Allow => {
            debug!(%action, user = session.user_id().unwrap_or_default(), "access allowed");
            Ok(())
        }
        GateDecision::Deny {
            message,
            redirect_to,
        } => {
            warn!(%action, "access denied: no signed-in user");
            Err(GateError::Unauthenticated {
                action,
                message,
                redirect_to,
            })
        }
    }
}

/// Check a username and password against the credential set.
///
/// Unknown usernames and wrong passwords produce the same `false`. For an
/// unknown username a bcrypt verification still runs against a dummy hash of
/// the same cost as the stored ones, so the two failures take comparable time. A stored hash that is not valid
/// bcrypt counts as a failure and is logged.
pub fn authenticate(username: &str, password: &str, credentials: &Credentials) -> bool {
    let Some(stored) = credentials.password_hash(username) else {
        if let Some(hash) = credentials.dummy_hash() {
            let _ = PasswordHasher::verify(password, hash);
        }
        return false;
    };

    match PasswordHasher::verify(password, stored) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(username, error = %e, "stored password hash is malformed");
            false
        }
    }
}

/// Move the session to the signed-in state.
pub fn sign_in(session: &mut Session, username: &str) {
    session.set_user_id(username);
}

/// Move the session to the signed-out state.
pub fn sign_out(session: &mut Session) {
    session.clear_user_id();
}
