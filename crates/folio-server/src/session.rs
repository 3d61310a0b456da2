//! Session transport.
//!
//! Two cookies carry a client's [`Session`]:
//!
//! - [`SESSION_COOKIE`] holds a token for a signed-in user. The token maps to
//!   the user in the server-side [`SessionStore`]. Only a successful sign-in
//!   creates an entry and sign-out removes it, so anonymous clients never
//!   occupy server memory.
//! - [`FLASH_COOKIE`] holds the pending one-shot message.
//!
//! [`session_layer`] rebuilds the session from both cookies before the
//! handler runs and writes any changes back as `Set-Cookie` headers after.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use cookie::{Cookie, SameSite};
use folio_crypto::SessionToken;
use folio_gate::Session;
use tracing::{debug, info};

use crate::state::AppState;

/// Name of the cookie that carries the signed-in session token.
pub const SESSION_COOKIE: &str = "folio_session";

/// Name of the cookie that carries the pending one-shot message.
pub const FLASH_COOKIE: &str = "folio_flash";

/// Default bound on concurrently signed-in sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

struct SessionEntry {
    user_id: String,
    last_seen: Instant,
}

/// Server-side table of signed-in sessions, keyed by session token.
///
/// Holds at most `capacity` entries. When full, starting a new session
/// evicts the one that was seen least recently.
pub struct SessionStore {
    entries: RwLock<HashMap<SessionToken, SessionEntry>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn contains(&self, token: &SessionToken) -> bool {
        self.entries
            .read()
            .expect("lock poisoned")
            .contains_key(token)
    }

    /// The user signed in under `token`. Marks the session as seen.
    pub fn user(&self, token: &SessionToken) -> Option<String> {
        let mut map = self.entries.write().expect("lock poisoned");
        let entry = map.get_mut(token)?;
        entry.last_seen = Instant::now();
        Some(entry.user_id.clone())
    }

    /// Start a session for `user_id` under a freshly generated token.
    pub fn insert(&self, user_id: &str) -> SessionToken {
        let token = SessionToken::generate();
        let mut map = self.entries.write().expect("lock poisoned");

        if map.len() >= self.capacity {
            let idle = map
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(token, _)| token.clone());
            if let Some(idle) = idle {
                map.remove(&idle);
                debug!(capacity = self.capacity, "evicted least recently seen session");
            }
        }

        map.insert(
            token.clone(),
            SessionEntry {
                user_id: user_id.to_string(),
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// End the session under `token`. Returns whether it existed.
    pub fn remove(&self, token: &SessionToken) -> bool {
        self.entries
            .write()
            .expect("lock poisoned")
            .remove(token)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session_count", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// The current request's session, shared between [`session_layer`] and the
/// handler through a request extension.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// A copy of the session as it stands now.
    pub fn snapshot(&self) -> Session {
        self.0.lock().expect("lock poisoned").clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.0.lock().expect("lock poisoned"))
    }
}

fn base_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The cookie that carries `token`.
pub fn session_cookie(token: &SessionToken) -> Cookie<'static> {
    base_cookie(SESSION_COOKIE, token.as_str().to_owned())
}

/// The cookie that carries a pending message.
pub fn flash_cookie(message: &str) -> Cookie<'static> {
    base_cookie(FLASH_COOKIE, message.to_owned())
}

/// A cookie that tells the client to drop `name`.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new());
    cookie.make_removal();
    cookie
}

/// Cookies sent with the request, percent-decoded. Malformed pairs are
/// skipped.
pub fn request_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse_encoded(value))
        .filter_map(Result::ok)
        .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned()))
        .collect()
}

fn append_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.encoded().to_string()) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => debug!(cookie = cookie.name(), error = %e, "cookie is not a valid header value"),
    }
}

/// Middleware that attaches a [`SessionHandle`] to every request and
/// persists what the handler changed.
///
/// - A user change swaps the session token: signing in always starts a new
///   token, and signing out deletes the old one.
/// - A session cookie with an unknown or malformed token is cleared.
/// - A changed message is written to, or cleared from, the flash cookie.
pub async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let cookies = request_cookies(req.headers());
    let presented = cookies.get(SESSION_COOKIE);
    let known = presented
        .and_then(|raw| SessionToken::parse(raw))
        .and_then(|token| state.sessions.user(&token).map(|user| (token, user)));
    let incoming_message = cookies
        .get(FLASH_COOKIE)
        .filter(|message| !message.is_empty())
        .cloned();

    let mut session = Session::new();
    if let Some((_, user)) = &known {
        session.set_user_id(user.clone());
    }
    if let Some(message) = &incoming_message {
        session.flash(message.clone());
    }
    let handle = SessionHandle::new(session);
    req.extensions_mut().insert(handle.clone());

    let mut response = next.run(req).await;
    let after = handle.snapshot();
    let headers = response.headers_mut();

    let user_before = known.as_ref().map(|(_, user)| user.as_str());
    if after.user_id() != user_before {
        if let Some((token, _)) = &known {
            state.sessions.remove(token);
        }
        match after.user_id() {
            Some(user) => {
                let token = state.sessions.insert(user);
                info!(user, "session started");
                append_cookie(headers, &session_cookie(&token));
            }
            None => {
                info!(user = user_before.unwrap_or_default(), "session ended");
                append_cookie(headers, &removal_cookie(SESSION_COOKIE));
            }
        }
    } else if presented.is_some() && known.is_none() {
        debug!("clearing unknown session cookie");
        append_cookie(headers, &removal_cookie(SESSION_COOKIE));
    }

    if after.message() != incoming_message.as_deref() {
        match after.message() {
            Some(message) => append_cookie(headers, &flash_cookie(message)),
            None => append_cookie(headers, &removal_cookie(FLASH_COOKIE)),
        }
    }

    response
}
