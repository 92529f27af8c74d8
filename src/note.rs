//! Core data structures for the quillnotes application.
//!
//! This module contains the note record itself plus the draft and
//! partial-update shapes the store accepts.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single note in our system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for the note, allocated by the store
    pub id: String,
    /// Note title, may be empty
    pub title: String,
    /// Note body as a markup string, opaque outside the rich text surface
    pub content: String,
    /// Tags for organization
    pub tags: Vec<String>,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Title as shown to the user; empty titles display as "Untitled Note".
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled Note"
        } else {
            &self.title
        }
    }
}

/// Fields supplied by the editor when creating a note.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Partial fields for an update; a `None` field leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    /// Full replacement of the editable fields, as produced by an editor save.
    pub fn full(title: String, content: String, tags: Vec<String>) -> Self {
        Self {
            title: Some(title),
            content: Some(content),
            tags: Some(tags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_substitutes_placeholder() {
        let note = Note {
            id: "1".to_string(),
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(note.display_title(), "Untitled Note");
    }
}
