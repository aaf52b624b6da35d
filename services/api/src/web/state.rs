//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use notes_core::ports::{NoteStore, UserStore};
use notes_core::service::NoteService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub users: Arc<dyn UserStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        note_store: Arc<dyn NoteStore>,
        users: Arc<dyn UserStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            notes: NoteService::new(note_store),
            users,
            config,
        }
    }
}
