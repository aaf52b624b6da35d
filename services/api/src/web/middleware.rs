//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use notes_core::ports::PortError;
use std::sync::Arc;
use tracing::{debug, error};

use crate::web::auth::session_id_from_headers;
use crate::web::state::AppState;

/// Where anonymous visitors of protected pages are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// A `302 Found` to the login page that remembers where the visitor was going.
pub fn redirect_to_login(next: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("{}?next={}", LOGIN_URL, next))],
    )
        .into_response()
}

/// Middleware that validates the auth session cookie and extracts the user_id.
///
/// If valid, inserts the user_id into request extensions for handlers to use.
/// If missing, unknown or expired, redirects to the login page without
/// running the handler.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Parse session ID from the cookie header
    let Some(auth_session_id) = session_id_from_headers(req.headers()).map(str::to_owned) else {
        return redirect_to_login(req.uri().path());
    };

    // 2. Validate auth session in database, get user_id
    let user_id = match state.users.validate_auth_session(&auth_session_id).await {
        Ok(user_id) => user_id,
        Err(PortError::Unauthorized) | Err(PortError::NotFound(_)) => {
            debug!("Rejected unknown or expired auth session");
            return redirect_to_login(req.uri().path());
        }
        Err(e) => {
            error!("Failed to validate auth session: {:?}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // 3. Insert user_id into request extensions
    req.extensions_mut().insert(user_id);

    // 4. Continue to the handler
    next.run(req).await
}
