//! services/api/src/web/notes.rs
//!
//! Contains the Axum handlers for the note pages and the master
//! definition for the OpenAPI specification.

use crate::error::ApiError;
use crate::web::auth::{self, AuthResponse, LoginRequest, SignupRequest};
use crate::web::middleware::LOGIN_URL;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension, Form,
};
use chrono::{DateTime, Utc};
use notes_core::{AuthContext, Note, NoteError, NoteFormData, UserId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Where every successful create, edit and delete leads.
pub const SUCCESS_URL: &str = "/done/";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        list_notes_handler,
        add_note_handler,
        note_detail_handler,
        edit_note_handler,
        delete_note_handler,
        success_handler,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            AuthResponse,
            NoteResponse,
            NoteListResponse,
            FormErrorResponse,
            SuccessResponse,
        )
    ),
    tags(
        (name = "Notes API", description = "Author-owned notes addressed by unique slugs.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A note as returned to its author.
#[derive(Serialize, ToSchema)]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            text: note.text,
            slug: note.slug,
            author: note.author,
            created_at: note.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct NoteListResponse {
    pub notes: Vec<NoteResponse>,
}

/// Field name to validation messages.
#[derive(Serialize, ToSchema)]
pub struct FormErrorResponse {
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    pub message: String,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Turns a `NoteError` into the HTTP response the client sees.
#[derive(Debug)]
pub struct WebError(NoteError);

impl From<NoteError> for WebError {
    fn from(error: NoteError) -> Self {
        Self(error)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.0 {
            // `require_auth` normally catches anonymous callers first.
            NoteError::NotAuthenticated => {
                (StatusCode::FOUND, [(header::LOCATION, LOGIN_URL)]).into_response()
            }
            NoteError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
            NoteError::Invalid(errors) => {
                let errors = errors
                    .messages()
                    .into_iter()
                    .map(|(field, messages)| (field.to_string(), messages))
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(FormErrorResponse { errors }),
                )
                    .into_response()
            }
            NoteError::Port(e) => {
                error!("Note storage failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

fn redirect_to_success() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, SUCCESS_URL)]).into_response()
}

//=========================================================================================
// Note Handlers
//=========================================================================================

/// List the caller's notes, oldest first.
#[utoipa::path(
    get,
    path = "/notes/",
    responses(
        (status = 200, description = "The caller's notes", body = NoteListResponse),
        (status = 302, description = "Not logged in, redirected to the login page")
    )
)]
pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<NoteListResponse>, WebError> {
    let notes = state
        .notes
        .list(&AuthContext::User(user_id))
        .await?;
    Ok(Json(NoteListResponse {
        notes: notes.into_iter().map(NoteResponse::from).collect(),
    }))
}

/// Create a note. A missing slug is derived from the title.
#[utoipa::path(
    post,
    path = "/add/",
    request_body(
        content_type = "application/x-www-form-urlencoded",
        description = "Fields `title`, `text` and an optional `slug`."
    ),
    responses(
        (status = 302, description = "Created, redirected to the success page"),
        (status = 422, description = "Validation failed", body = FormErrorResponse)
    )
)]
pub async fn add_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<UserId>,
    Form(data): Form<NoteFormData>,
) -> Result<Response, WebError> {
    state
        .notes
        .create(&AuthContext::User(user_id), &data)
        .await?;
    Ok(redirect_to_success())
}

/// Show one of the caller's notes.
#[utoipa::path(
    get,
    path = "/note/{slug}/",
    params(("slug" = String, Path, description = "The note's slug.")),
    responses(
        (status = 200, description = "The note", body = NoteResponse),
        (status = 404, description = "No such note among the caller's notes")
    )
)]
pub async fn note_detail_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<UserId>,
    Path(slug): Path<String>,
) -> Result<Json<NoteResponse>, WebError> {
    let note = state
        .notes
        .detail(&AuthContext::User(user_id), &slug)
        .await?;
    Ok(Json(note.into()))
}

/// Replace title, text and slug of one of the caller's notes.
#[utoipa::path(
    post,
    path = "/edit/{slug}/",
    params(("slug" = String, Path, description = "The note's current slug.")),
    request_body(
        content_type = "application/x-www-form-urlencoded",
        description = "Fields `title`, `text` and an optional `slug`."
    ),
    responses(
        (status = 302, description = "Updated, redirected to the success page"),
        (status = 404, description = "No such note among the caller's notes"),
        (status = 422, description = "Validation failed", body = FormErrorResponse)
    )
)]
pub async fn edit_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<UserId>,
    Path(slug): Path<String>,
    Form(data): Form<NoteFormData>,
) -> Result<Response, WebError> {
    state
        .notes
        .edit(&AuthContext::User(user_id), &slug, &data)
        .await?;
    Ok(redirect_to_success())
}

/// Delete one of the caller's notes. Accepts both POST and DELETE.
#[utoipa::path(
    delete,
    path = "/delete/{slug}/",
    params(("slug" = String, Path, description = "The note's slug.")),
    responses(
        (status = 302, description = "Deleted, redirected to the success page"),
        (status = 404, description = "No such note among the caller's notes")
    )
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<UserId>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    state
        .notes
        .delete(&AuthContext::User(user_id), &slug)
        .await?;
    Ok(redirect_to_success())
}

/// The page every successful mutation redirects to.
#[utoipa::path(
    get,
    path = "/done/",
    responses((status = 200, description = "Operation succeeded", body = SuccessResponse))
)]
pub async fn success_handler() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "Operation completed successfully.".to_string(),
    })
}

/// Serves the generated OpenAPI document.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Renders the OpenAPI document to `path` as pretty-printed JSON.
pub fn write_openapi(path: &std::path::Path) -> Result<(), ApiError> {
    std::fs::write(path, ApiDoc::openapi().to_pretty_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::{FormErrors, PortError};
    use pretty_assertions::assert_eq;

    #[test]
    fn anonymous_caller_is_sent_to_login() {
        let response = WebError::from(NoteError::NotAuthenticated).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_URL);
    }

    #[test]
    fn note_errors_map_to_statuses() {
        let status = |e: NoteError| WebError::from(e).into_response().status();
        assert_eq!(status(NoteError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(NoteError::Invalid(FormErrors::duplicate_slug("Slug"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(NoteError::Port(PortError::Unexpected("disk".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
