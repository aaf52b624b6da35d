//! crates/notes_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a user account.
pub type UserId = Uuid;

/// Identifies a note.
pub type NoteId = Uuid;

/// A short text note owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Builds a fresh note with a newly assigned id.
    pub fn new(author: UserId, title: String, text: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            slug,
            author,
            created_at: Utc::now(),
        }
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author == user_id
    }
}

/// The mutable part of a note. `author` and `id` are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}

/// Raw note data as submitted by a client, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: Option<String>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: UserId,
    pub username: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// The identity a request is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    User(UserId),
}

impl AuthContext {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            AuthContext::Anonymous => None,
            AuthContext::User(id) => Some(*id),
        }
    }
}

impl From<Option<UserId>> for AuthContext {
    fn from(user: Option<UserId>) -> Self {
        user.map_or(AuthContext::Anonymous, AuthContext::User)
    }
}
