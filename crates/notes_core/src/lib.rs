pub mod domain;
pub mod form;
pub mod memory;
pub mod ports;
pub mod service;
pub mod slug;

pub use domain::{
    AuthContext, AuthSession, Note, NoteChanges, NoteFormData, NoteId, User, UserCredentials,
    UserId,
};
pub use form::{Field, FieldError, FieldErrorKind, FormErrors, WARNING};
pub use memory::InMemoryNoteStore;
pub use ports::{NoteStore, PortError, PortResult, UserStore};
pub use service::{NoteError, NoteResult, NoteService};
