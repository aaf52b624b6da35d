//! crates/notes_core/src/service.rs
//!
//! The note form processor: authenticates the caller, runs form validation,
//! checks slug uniqueness and performs exactly one store mutation per
//! successful call.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{AuthContext, Note, NoteFormData, NoteId, UserId};
use crate::form::{self, CleanedNote, Field, FieldError, FormErrors};
use crate::ports::{NoteStore, PortError};

/// Errors surfaced by `NoteService`.
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// The caller is anonymous.
    #[error("Authentication required")]
    NotAuthenticated,
    /// The note does not exist, or exists but belongs to someone else.
    /// The two cases are intentionally indistinguishable.
    #[error("Note not found")]
    NotFound,
    #[error("Invalid note data: {0}")]
    Invalid(FormErrors),
    #[error("Storage error: {0}")]
    Port(#[from] PortError),
}

pub type NoteResult<T> = Result<T, NoteError>;

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Creates a note authored by the caller.
    pub async fn create(&self, ctx: &AuthContext, data: &NoteFormData) -> NoteResult<Note> {
        let author = require_user(ctx)?;
        let cleaned = self.validate(data, None).await?;

        let note = Note::new(author, cleaned.title, cleaned.text, cleaned.slug);
        let note = self.store.create(note).await.map_err(slug_conflict)?;
        info!(note_id = %note.id, slug = %note.slug, author = %author, "Note created");
        Ok(note)
    }

    /// Replaces title, text and slug of the caller's note `slug`.
    pub async fn edit(
        &self,
        ctx: &AuthContext,
        slug: &str,
        data: &NoteFormData,
    ) -> NoteResult<Note> {
        let user = require_user(ctx)?;
        let note = self.owned_note(user, slug).await?;
        let cleaned = self.validate(data, Some(note.id)).await?;

        let updated = self
            .store
            .update(note.id, cleaned.into())
            .await
            .map_err(slug_conflict)?;
        info!(note_id = %updated.id, slug = %updated.slug, "Note updated");
        Ok(updated)
    }

    /// Deletes the caller's note `slug`. No form validation is involved.
    pub async fn delete(&self, ctx: &AuthContext, slug: &str) -> NoteResult<()> {
        let user = require_user(ctx)?;
        let note = self.owned_note(user, slug).await?;
        self.store.delete(note.id).await.map_err(not_found)?;
        info!(note_id = %note.id, slug = %note.slug, "Note deleted");
        Ok(())
    }

    /// Fetches one of the caller's notes.
    pub async fn detail(&self, ctx: &AuthContext, slug: &str) -> NoteResult<Note> {
        let user = require_user(ctx)?;
        self.owned_note(user, slug).await
    }

    /// The caller's notes, oldest first.
    pub async fn list(&self, ctx: &AuthContext) -> NoteResult<Vec<Note>> {
        let user = require_user(ctx)?;
        Ok(self.store.list_by_author(user).await?)
    }

    /// The single authorization guard for reading, editing and deleting.
    /// Foreign notes are reported exactly like missing ones.
    async fn owned_note(&self, user: UserId, slug: &str) -> NoteResult<Note> {
        let note = self.store.get_by_slug(slug).await.map_err(not_found)?;
        if !note.is_authored_by(user) {
            warn!(slug = %slug, user = %user, "Rejected access to a note owned by another user");
            return Err(NoteError::NotFound);
        }
        Ok(note)
    }

    /// Runs the field checks and the slug lookup together, so a taken slug is
    /// reported alongside any other field errors.
    async fn validate(
        &self,
        data: &NoteFormData,
        owner: Option<NoteId>,
    ) -> NoteResult<CleanedNote> {
        let cleaned = form::clean(data);
        let mut errors = cleaned.as_ref().err().cloned().unwrap_or_default();

        // Only a well-formed slug can collide with a stored one.
        let slug = form::effective_slug(data);
        if !slug.is_empty()
            && errors.get(Field::Slug).is_empty()
            && self.slug_taken(&slug, owner).await?
        {
            errors.add(Field::Slug, FieldError::duplicate_slug(&slug));
        }

        if !errors.is_empty() {
            return Err(NoteError::Invalid(errors));
        }
        cleaned.map_err(NoteError::Invalid)
    }

    async fn slug_taken(&self, slug: &str, owner: Option<NoteId>) -> NoteResult<bool> {
        match self.store.get_by_slug(slug).await {
            Ok(existing) => Ok(Some(existing.id) != owner),
            Err(PortError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn require_user(ctx: &AuthContext) -> NoteResult<UserId> {
    ctx.user_id().ok_or(NoteError::NotAuthenticated)
}

fn not_found(e: PortError) -> NoteError {
    match e {
        PortError::NotFound(_) => NoteError::NotFound,
        other => NoteError::Port(other),
    }
}

// The store is the final arbiter: a concurrent writer can take the slug
// between our pre-check and the write.
fn slug_conflict(e: PortError) -> NoteError {
    match e {
        PortError::DuplicateSlug(slug) => NoteError::Invalid(FormErrors::duplicate_slug(&slug)),
        PortError::NotFound(_) => NoteError::NotFound,
        other => NoteError::Port(other),
    }
}
