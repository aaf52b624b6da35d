//! crates/notes_core/src/memory.rs
//!
//! An in-process `NoteStore`. All state sits behind a single lock, so the
//! slug check and the write that follows it can never interleave with
//! another writer.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Note, NoteChanges, NoteId, UserId};
use crate::ports::{NoteStore, PortError, PortResult};

#[derive(Default)]
pub struct InMemoryNoteStore {
    // Insertion order doubles as creation order.
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn create(&self, note: Note) -> PortResult<Note> {
        let mut notes = self.notes.lock().await;
        if notes.iter().any(|n| n.slug == note.slug) {
            return Err(PortError::DuplicateSlug(note.slug));
        }
        notes.push(note.clone());
        Ok(note)
    }

    async fn get_by_slug(&self, slug: &str) -> PortResult<Note> {
        self.notes
            .lock()
            .await
            .iter()
            .find(|n| n.slug == slug)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Note with slug {} not found", slug)))
    }

    async fn update(&self, id: NoteId, changes: NoteChanges) -> PortResult<Note> {
        let mut notes = self.notes.lock().await;
        if notes.iter().any(|n| n.slug == changes.slug && n.id != id) {
            return Err(PortError::DuplicateSlug(changes.slug));
        }
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Note {} not found", id)))?;
        note.title = changes.title;
        note.text = changes.text;
        note.slug = changes.slug;
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> PortResult<()> {
        let mut notes = self.notes.lock().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(PortError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    async fn count(&self) -> PortResult<u64> {
        Ok(self.notes.lock().await.len() as u64)
    }

    async fn list_by_author(&self, author: UserId) -> PortResult<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .iter()
            .filter(|n| n.author == author)
            .cloned()
            .collect())
    }
}
