use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::session::session_layer;
use crate::state::AppState;

/// Build the axum router with all Folio routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::index))
        .route("/new", get(handler::new_form))
        .route("/create", post(handler::create))
        .route("/users/signin", get(handler::signin_form).post(handler::signin))
        .route("/users/signout", post(handler::signout))
        .route("/:filename", get(handler::show).post(handler::update))
        .route("/:filename/raw", get(handler::raw))
        .route("/:filename/edit", get(handler::edit_form))
        .route("/:filename/delete", post(handler::delete))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
