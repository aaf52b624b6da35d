//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation
//! of the `NoteStore` and `UserStore` ports from the `core` crate. It handles all
//! interactions with the SQLite database using `sqlx`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_core::domain::{Note, NoteChanges, NoteId, User, UserCredentials, UserId};
use notes_core::ports::{NoteStore, PortError, PortResult, UserStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `NoteStore` and `UserStore` ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// A private in-memory database with the schema applied.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let adapter = Self::new(pool);
        adapter.run_migrations().await?;
        Ok(adapter)
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserCredentialsRecord {
    user_id: Uuid,
    username: String,
    hashed_password: String,
}
impl UserCredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            username: self.username,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct NoteRecord {
    id: Uuid,
    title: String,
    text: String,
    slug: String,
    author: Uuid,
    created_at: DateTime<Utc>,
}
impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            text: self.text,
            slug: self.slug,
            author: self.author,
            created_at: self.created_at,
        }
    }
}

const NOTE_COLUMNS: &str = "id, title, text, slug, author, created_at";

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Maps a unique-index violation on `notes.slug` to `DuplicateSlug`.
fn slug_write_error(e: sqlx::Error, slug: &str) -> PortError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            PortError::DuplicateSlug(slug.to_string())
        }
        _ => unexpected(e),
    }
}

//=========================================================================================
// `NoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteStore for DbAdapter {
    async fn create(&self, note: Note) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&format!(
            "INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note.id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(&note.slug)
        .bind(note.author)
        .bind(note.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| slug_write_error(e, &note.slug))?;
        Ok(record.to_domain())
    }

    async fn get_by_slug(&self, slug: &str) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Note with slug {} not found", slug))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn update(&self, id: NoteId, changes: NoteChanges) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&format!(
            "UPDATE notes SET title = ?, text = ?, slug = ? WHERE id = ? RETURNING {NOTE_COLUMNS}"
        ))
        .bind(&changes.title)
        .bind(&changes.text)
        .bind(&changes.slug)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| slug_write_error(e, &changes.slug))?
        .ok_or_else(|| PortError::NotFound(format!("Note {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn delete(&self, id: NoteId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    async fn count(&self) -> PortResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(count as u64)
    }

    async fn list_by_author(&self, author: UserId) -> PortResult<Vec<Note>> {
        let records = sqlx::query_as::<_, NoteRecord>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE author = ? ORDER BY created_at ASC, rowid ASC"
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let notes = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(notes)
    }
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for DbAdapter {
    async fn create_user(&self, username: &str, hashed_password: &str) -> PortResult<User> {
        let user_id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (user_id, username, hashed_password) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(username)
            .bind(hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    PortError::Conflict(format!("Username {} is taken", username))
                }
                _ => unexpected(e),
            })?;

        Ok(User {
            user_id,
            username: username.to_string(),
        })
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserCredentialsRecord>(
            "SELECT user_id, username, hashed_password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", username)),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<UserId> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT user_id, expires_at FROM auth_sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)?;

        if record.expires_at <= Utc::now() {
            self.delete_auth_session(session_id).await?;
            return Err(PortError::Unauthorized);
        }
        Ok(record.user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
