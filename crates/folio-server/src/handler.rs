use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Form};
use folio_gate::{Action, GateError};
use folio_store::{DocumentKind, StoreError};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::markdown::render_markdown;
use crate::session::SessionHandle;
use crate::state::AppState;
use crate::views::{self, PageContext};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub new_filename: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: String,
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Flash `message` and redirect to `location`.
fn redirect_with(session: &SessionHandle, location: &str, message: impl Into<String>) -> Response {
    session.update(|s| s.flash(message));
    found(location)
}

/// The banner state for a rendered page. Consumes the pending message.
fn page_context(session: &SessionHandle) -> PageContext {
    session.update(|s| PageContext {
        user: s.user_id().map(str::to_owned),
        message: s.take_message(),
    })
}

/// Run the access gate for `action`. On denial, the returned response
/// carries the flash and redirect.
fn guard(session: &SessionHandle, action: Action) -> Result<(), Response> {
    folio_gate::authorize(&session.snapshot(), action).map_err(|err| match err {
        GateError::Unauthenticated {
            message,
            redirect_to,
            ..
        } => redirect_with(session, &redirect_to, message),
        other => ServerError::from(other).into_response(),
    })
}

fn does_not_exist(session: &SessionHandle, name: &str) -> Response {
    redirect_with(session, "/", format!("{name} does not exist."))
}

// ---------------------------------------------------------------------------
// Read routes
// ---------------------------------------------------------------------------

pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> ServerResult<Html<String>> {
    let mut names = state.store.list()?;
    names.sort();
    let ctx = page_context(&session);
    Ok(Html(views::index(&ctx, &names)))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    let document = match state.store.read(&name) {
        Ok(document) => document,
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            return Ok(does_not_exist(&session, &name));
        }
        Err(e) => return Err(e.into()),
    };

    match document.kind {
        DocumentKind::Text => Ok(([(CONTENT_TYPE, TEXT_PLAIN)], document.content).into_response()),
        DocumentKind::Markdown => {
            let rendered = render_markdown(&document.text());
            let ctx = page_context(&session);
            Ok(Html(views::markdown_document(&ctx, &name, &rendered)).into_response())
        }
    }
}

/// Content verbatim, whatever the kind. Markdown is not rendered.
pub async fn raw(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    let content = match state.store.read_bytes(&name) {
        Ok(content) => content,
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            return Ok(does_not_exist(&session, &name));
        }
        Err(e) => return Err(e.into()),
    };
    let content_type = match DocumentKind::from_name(&name) {
        Some(_) => TEXT_PLAIN,
        None => OCTET_STREAM,
    };
    Ok(([(CONTENT_TYPE, content_type)], content).into_response())
}

// ---------------------------------------------------------------------------
// Guarded routes
// ---------------------------------------------------------------------------

pub async fn new_form(Extension(session): Extension<SessionHandle>) -> Response {
    if let Err(denied) = guard(&session, Action::NewForm) {
        return denied;
    }
    let ctx = page_context(&session);
    Html(views::new_document(&ctx, "")).into_response()
}

pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<CreateForm>,
) -> ServerResult<Response> {
    if let Err(denied) = guard(&session, Action::Create) {
        return Ok(denied);
    }
    let name = form.new_filename;

    match state.store.create(&name, b"") {
        Ok(()) => {
            info!(name = %name, "document created");
            Ok(redirect_with(&session, "/", format!("{name} was successfully created.")))
        }
        Err(StoreError::InvalidName { reason, .. }) => {
            let message = if name.is_empty() {
                "A name is required.".to_string()
            } else {
                format!("{name} is not a valid document name: {reason}.")
            };
            let ctx = page_context(&session).with_message(message);
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::new_document(&ctx, &name)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    if let Err(denied) = guard(&session, Action::EditForm) {
        return Ok(denied);
    }
    let content = match state.store.read_bytes(&name) {
        Ok(content) => content,
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            return Ok(does_not_exist(&session, &name));
        }
        Err(e) => return Err(e.into()),
    };
    let ctx = page_context(&session);
    let content = String::from_utf8_lossy(&content);
    Ok(Html(views::edit_document(&ctx, &name, &content)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
    Form(form): Form<UpdateForm>,
) -> ServerResult<Response> {
    if let Err(denied) = guard(&session, Action::Update) {
        return Ok(denied);
    }
    match state.store.update(&name, form.content.as_bytes()) {
        Ok(()) => Ok(redirect_with(&session, "/", format!("{name} has been updated."))),
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            Ok(does_not_exist(&session, &name))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    if let Err(denied) = guard(&session, Action::Delete) {
        return Ok(denied);
    }
    match state.store.delete(&name) {
        Ok(()) => Ok(redirect_with(&session, "/", format!("{name} has been deleted."))),
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            Ok(does_not_exist(&session, &name))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Sign-in
// ---------------------------------------------------------------------------

pub async fn signin_form(Extension(session): Extension<SessionHandle>) -> Response {
    if folio_gate::is_authenticated(&session.snapshot()) {
        return found("/");
    }
    let ctx = page_context(&session);
    Html(views::signin(&ctx, "")).into_response()
}

pub async fn signin(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<SignInForm>,
) -> ServerResult<Response> {
    let credentials = Arc::clone(&state.credentials);
    let username = form.user_id.clone();
    let password = form.password;
    let accepted = tokio::task::spawn_blocking(move || {
        folio_gate::authenticate(&username, &password, &credentials)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("sign-in task failed: {e}")))?;

    if !accepted {
        warn!(username = %form.user_id, "failed sign-in");
        let ctx = page_context(&session).with_message("Invalid credentials.");
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::signin(&ctx, &form.user_id)),
        )
            .into_response());
    }

    // The session layer moves a newly signed-in session to a fresh token.
    session.update(|s| {
        folio_gate::sign_in(s, &form.user_id);
        s.flash("Welcome!");
    });
    info!(username = %form.user_id, "signed in");
    Ok(found("/"))
}

pub async fn signout(Extension(session): Extension<SessionHandle>) -> Response {
    session.update(|s| {
        folio_gate::sign_out(s);
        s.flash("You have been signed out.");
    });
    found("/")
}
