//! crates/notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific storage and session implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Note, NoteChanges, NoteId, User, UserCredentials, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Another note already uses this slug. Carries the offending slug.
    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Keyed storage of notes with a unique slug index.
///
/// Implementations must enforce slug uniqueness atomically with the write:
/// two concurrent `create` calls with the same slug must never both succeed.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persists `note`. Fails with `DuplicateSlug` if the slug is taken.
    async fn create(&self, note: Note) -> PortResult<Note>;

    async fn get_by_slug(&self, slug: &str) -> PortResult<Note>;

    /// Replaces title, text and slug of the note `id`. The note's own slug
    /// never counts as a collision.
    async fn update(&self, id: NoteId, changes: NoteChanges) -> PortResult<Note>;

    /// Removes the note. A second delete of the same id yields `NotFound`.
    async fn delete(&self, id: NoteId) -> PortResult<()>;

    async fn count(&self) -> PortResult<u64>;

    /// The author's notes, oldest first.
    async fn list_by_author(&self, author: UserId) -> PortResult<Vec<Note>>;
}

/// User accounts and their browser login sessions.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a live session to its user. Unknown or expired sessions
    /// yield `Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<UserId>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
