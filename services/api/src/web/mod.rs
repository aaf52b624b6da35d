pub mod auth;
pub mod middleware;
pub mod notes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::web::auth::{login_handler, logout_handler, signup_handler};
use crate::web::notes::{
    add_note_handler, delete_note_handler, edit_note_handler, list_notes_handler,
    note_detail_handler, openapi_handler, success_handler,
};
use crate::web::state::AppState;

pub use middleware::require_auth;

/// Builds the full application router on top of `state`.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup/", post(signup_handler))
        .route("/auth/login/", post(login_handler))
        .route("/auth/logout/", post(logout_handler))
        .route("/api-docs/openapi.json", get(openapi_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/notes/", get(list_notes_handler))
        .route("/add/", post(add_note_handler))
        .route("/note/{slug}/", get(note_detail_handler))
        .route("/edit/{slug}/", post(edit_note_handler))
        .route(
            "/delete/{slug}/",
            post(delete_note_handler).delete(delete_note_handler),
        )
        .route("/done/", get(success_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
