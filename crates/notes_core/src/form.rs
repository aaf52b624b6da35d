//! crates/notes_core/src/form.rs
//!
//! Validation of submitted note data. Everything here is pure: the check
//! against existing slugs happens in the service, which owns the store.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{NoteChanges, NoteFormData};
use crate::slug::{is_valid_slug, slugify, MAX_SLUG_LENGTH};

/// Suffix appended to a slug that is already taken by another note.
pub const WARNING: &str = " - relative URL address of the note already exists.";

pub const MAX_TITLE_LENGTH: usize = 100;

/// A form field that can carry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Text,
    Slug,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Text => "text",
            Field::Slug => "slug",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    RequiredFieldMissing,
    TooLong,
    InvalidSlug,
    DuplicateSlug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    fn required() -> Self {
        Self {
            kind: FieldErrorKind::RequiredFieldMissing,
            message: "This field is required.".to_string(),
        }
    }

    fn too_long(limit: usize, actual: usize) -> Self {
        Self {
            kind: FieldErrorKind::TooLong,
            message: format!(
                "Ensure this value has at most {limit} characters (it has {actual})."
            ),
        }
    }

    fn invalid_slug() -> Self {
        Self {
            kind: FieldErrorKind::InvalidSlug,
            message: "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
                .to_string(),
        }
    }

    /// The error reported when `slug` belongs to another note.
    pub fn duplicate_slug(slug: &str) -> Self {
        Self {
            kind: FieldErrorKind::DuplicateSlug,
            message: format!("{slug}{WARNING}"),
        }
    }
}

/// Field-level validation errors, grouped by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<Field, Vec<FieldError>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a form rejected only because of a taken slug.
    pub fn duplicate_slug(slug: &str) -> Self {
        let mut errors = Self::new();
        errors.add(Field::Slug, FieldError::duplicate_slug(slug));
        errors
    }

    pub fn add(&mut self, field: Field, error: FieldError) {
        self.fields.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: Field) -> &[FieldError] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: Field, kind: FieldErrorKind) -> bool {
        self.get(field).iter().any(|e| e.kind == kind)
    }

    /// Field name to messages, the shape clients receive.
    pub fn messages(&self) -> BTreeMap<&'static str, Vec<String>> {
        self.fields
            .iter()
            .map(|(field, errors)| {
                (
                    field.as_str(),
                    errors.iter().map(|e| e.message.clone()).collect(),
                )
            })
            .collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.fields {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {}", error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Validated note fields with the effective slug filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl From<CleanedNote> for NoteChanges {
    fn from(cleaned: CleanedNote) -> Self {
        NoteChanges {
            title: cleaned.title,
            text: cleaned.text,
            slug: cleaned.slug,
        }
    }
}

/// The slug a submission will be stored under: the submitted one, or the
/// title's slug when none was given.
pub fn effective_slug(data: &NoteFormData) -> String {
    let submitted = data.slug.as_deref().map(str::trim).unwrap_or_default();
    if submitted.is_empty() {
        slugify(data.title.trim())
    } else {
        submitted.to_string()
    }
}

/// Validates `data` and derives the slug from the title when none was given.
///
/// All fields are checked; errors are reported together.
pub fn clean(data: &NoteFormData) -> Result<CleanedNote, FormErrors> {
    let mut errors = FormErrors::new();

    let title = data.title.trim();
    let title_len = title.chars().count();
    if title.is_empty() {
        errors.add(Field::Title, FieldError::required());
    } else if title_len > MAX_TITLE_LENGTH {
        errors.add(Field::Title, FieldError::too_long(MAX_TITLE_LENGTH, title_len));
    }

    let text = data.text.trim();

    let submitted_slug = data.slug.as_deref().map(str::trim).unwrap_or_default();
    if !submitted_slug.is_empty() {
        let slug_len = submitted_slug.chars().count();
        if slug_len > MAX_SLUG_LENGTH {
            errors.add(Field::Slug, FieldError::too_long(MAX_SLUG_LENGTH, slug_len));
        } else if !is_valid_slug(submitted_slug) {
            errors.add(Field::Slug, FieldError::invalid_slug());
        }
    }
    let slug = effective_slug(data);

    // A title made only of punctuation slugifies to nothing.
    if slug.is_empty() && !title.is_empty() {
        errors.add(Field::Slug, FieldError::invalid_slug());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CleanedNote {
        title: title.to_string(),
        text: text.to_string(),
        slug,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form(title: &str, text: &str, slug: Option<&str>) -> NoteFormData {
        NoteFormData {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.map(str::to_string),
        }
    }

    #[test]
    fn keeps_explicit_slug() {
        let cleaned = clean(&form("Текст заголовка", "Текст заметки", Some("slug"))).unwrap();
        assert_eq!(
            cleaned,
            CleanedNote {
                title: "Текст заголовка".to_string(),
                text: "Текст заметки".to_string(),
                slug: "slug".to_string(),
            }
        );
    }

    #[test]
    fn derives_slug_when_missing_or_blank() {
        let missing = clean(&form("Текст заголовка", "x", None)).unwrap();
        let blank = clean(&form("Текст заголовка", "x", Some("   "))).unwrap();
        assert_eq!(missing.slug, slugify("Текст заголовка"));
        assert_eq!(blank.slug, missing.slug);
    }

    #[test]
    fn empty_title_is_required() {
        let errors = clean(&form("  ", "body", Some("ok"))).unwrap_err();
        assert!(errors.has(Field::Title, FieldErrorKind::RequiredFieldMissing));
        assert!(errors.get(Field::Slug).is_empty());
    }

    #[test]
    fn reports_every_bad_field() {
        let long_title = "t".repeat(MAX_TITLE_LENGTH + 1);
        let errors = clean(&form(&long_title, "body", Some("not a slug"))).unwrap_err();
        assert!(errors.has(Field::Title, FieldErrorKind::TooLong));
        assert!(errors.has(Field::Slug, FieldErrorKind::InvalidSlug));
    }

    #[test]
    fn overlong_explicit_slug_is_too_long() {
        let slug = "s".repeat(MAX_SLUG_LENGTH + 1);
        let errors = clean(&form("Заголовок", "body", Some(&slug))).unwrap_err();
        assert!(errors.has(Field::Slug, FieldErrorKind::TooLong));
        assert!(!errors.has(Field::Slug, FieldErrorKind::InvalidSlug));
        assert!(errors.get(Field::Title).is_empty());
    }

    #[test]
    fn effective_slug_prefers_submitted_value() {
        assert_eq!(effective_slug(&form("Текст заголовка", "", Some(" mine "))), "mine");
        assert_eq!(
            effective_slug(&form("Текст заголовка", "", None)),
            slugify("Текст заголовка")
        );
        assert_eq!(effective_slug(&form("", "", None)), "");
    }

    #[test]
    fn punctuation_only_title_has_no_slug() {
        let errors = clean(&form("!!!", "body", None)).unwrap_err();
        assert!(errors.has(Field::Slug, FieldErrorKind::InvalidSlug));
    }

    #[test]
    fn duplicate_message_appends_warning() {
        let errors = FormErrors::duplicate_slug("Slug");
        let messages = errors.messages();
        assert_eq!(messages["slug"], vec![format!("Slug{WARNING}")]);
    }
}
