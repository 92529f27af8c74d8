//! Editor session state machine.
//!
//! A session holds the draft state for one note: either a brand-new draft
//! with no identity yet, or a draft hydrated from an existing note. The
//! session owns nothing in the store; it reconciles the draft into the store
//! on save, and the `New -> Existing` transition happens exactly once, when
//! the first save hands back a store-allocated id.
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::{
    format_relative_time, NoteDraft, NoteStore, NoteUpdate, QnError, Result, SaveOutcome,
};

/// Which note the session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Blank draft, no identity until the first save
    New,
    /// Draft bound to a persisted note
    Existing(String),
}

/// Draft state for a single note being edited.
#[derive(Debug)]
pub struct EditorSession {
    binding: Binding,
    title: String,
    content: String,
    tags: Vec<String>,
    has_unsaved_changes: bool,
    last_saved_at: DateTime<Utc>,
}

impl EditorSession {
    /// Starts a blank session for the create-new flow.
    pub fn new_note() -> Self {
        Self {
            binding: Binding::New,
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            has_unsaved_changes: false,
            last_saved_at: Utc::now(),
        }
    }

    /// Hydrates a session from an existing note.
    pub fn open(store: &NoteStore, id: &str) -> Result<Self> {
        let note = store.find_by_id(id).ok_or_else(|| QnError::NoteNotFound {
            id: id.to_string(),
        })?;

        debug!("Hydrating editor session for note {}", id);
        Ok(Self {
            binding: Binding::Existing(note.id.clone()),
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            has_unsaved_changes: false,
            last_saved_at: note.updated_at,
        })
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The bound note id, once the session has one.
    pub fn note_id(&self) -> Option<&str> {
        match &self.binding {
            Binding::New => None,
            Binding::Existing(id) => Some(id),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn last_saved_at(&self) -> DateTime<Utc> {
        self.last_saved_at
    }

    /// Replaces the draft title and marks the session dirty.
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.has_unsaved_changes = true;
    }

    /// Replaces the draft markup content and marks the session dirty.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.has_unsaved_changes = true;
    }

    /// Adds a tag to the draft. Whitespace is trimmed; empty and duplicate
    /// submissions are rejected silently. Returns whether the tag was added.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }

        self.tags.push(tag.to_string());
        self.has_unsaved_changes = true;
        true
    }

    /// Removes a tag by exact string equality. Returns whether it was found.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() < before {
            self.has_unsaved_changes = true;
            true
        } else {
            false
        }
    }

    /// Reconciles the draft into the store.
    ///
    /// An existing session updates its note in place; a new session creates
    /// the note, takes the allocated id, and rebinds itself without touching
    /// the draft. Either way the dirty flag clears and `last_saved_at`
    /// advances.
    pub fn save(&mut self, store: &mut NoteStore) -> SaveOutcome {
        let outcome = match &self.binding {
            Binding::Existing(id) => {
                store.update(
                    id,
                    NoteUpdate::full(self.title.clone(), self.content.clone(), self.tags.clone()),
                );
                SaveOutcome::Updated
            }
            Binding::New => {
                let note = store.add(NoteDraft {
                    title: self.title.clone(),
                    content: self.content.clone(),
                    tags: self.tags.clone(),
                });
                info!("Editor session bound to new note {}", note.id);
                self.binding = Binding::Existing(note.id.clone());
                SaveOutcome::Created(note.id)
            }
        };

        self.has_unsaved_changes = false;
        self.last_saved_at = Utc::now();
        outcome
    }

    /// Deletes the bound note from the store. Only an existing session can
    /// delete; the caller is responsible for confirmation beforehand.
    pub fn delete(&self, store: &mut NoteStore) -> Result<()> {
        match &self.binding {
            Binding::Existing(id) => {
                store.remove(id);
                Ok(())
            }
            Binding::New => Err(QnError::EditorError {
                message: "Nothing to delete: this note has not been saved yet".to_string(),
            }),
        }
    }

    /// Whether closing now requires a discard confirmation.
    pub fn needs_close_confirmation(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Status line for the editor footer.
    pub fn status_line(&self) -> String {
        if self.has_unsaved_changes {
            "Auto-saving...".to_string()
        } else {
            format!("Last saved: {}", format_relative_time(self.last_saved_at))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_save_transitions_new_to_existing() {
        let mut store = NoteStore::new();
        let mut session = EditorSession::new_note();
        session.set_title("Fresh".to_string());

        assert_eq!(session.binding(), &Binding::New);
        let outcome = session.save(&mut store);

        let id = match outcome {
            SaveOutcome::Created(id) => id,
            SaveOutcome::Updated => panic!("first save must create"),
        };
        assert_eq!(session.note_id(), Some(id.as_str()));
        assert!(!session.has_unsaved_changes());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn later_saves_update_instead_of_adding() {
        let mut store = NoteStore::new();
        let mut session = EditorSession::new_note();
        session.set_title("Once".to_string());
        session.save(&mut store);

        session.set_content("<b>body</b>".to_string());
        let outcome = session.save(&mut store);

        assert_eq!(outcome, SaveOutcome::Updated);
        assert_eq!(store.len(), 1);
        let id = session.note_id().unwrap();
        assert_eq!(store.find_by_id(id).unwrap().content, "<b>body</b>");
    }

    #[test]
    fn open_hydrates_draft_from_the_store() {
        let mut store = NoteStore::new();
        let note = store.add(NoteDraft {
            title: "Stored".to_string(),
            content: "<i>hi</i>".to_string(),
            tags: vec!["one".to_string()],
        });

        let session = EditorSession::open(&store, &note.id).unwrap();
        assert_eq!(session.title(), "Stored");
        assert_eq!(session.content(), "<i>hi</i>");
        assert_eq!(session.tags(), ["one".to_string()]);
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.last_saved_at(), note.updated_at);
    }

    #[test]
    fn open_missing_note_is_an_error() {
        let store = NoteStore::new();
        assert!(matches!(
            EditorSession::open(&store, "nope"),
            Err(QnError::NoteNotFound { .. })
        ));
    }

    #[test]
    fn edits_mark_the_session_dirty() {
        let mut session = EditorSession::new_note();
        assert!(!session.has_unsaved_changes());

        session.set_title("t".to_string());
        assert!(session.has_unsaved_changes());

        let mut store = NoteStore::new();
        session.save(&mut store);
        assert!(!session.has_unsaved_changes());

        session.set_content("c".to_string());
        assert!(session.needs_close_confirmation());
    }

    #[test]
    fn duplicate_and_blank_tags_are_rejected() {
        let mut session = EditorSession::new_note();

        assert!(session.add_tag("work"));
        assert!(!session.add_tag("work"));
        assert!(!session.add_tag("  "));
        assert_eq!(session.tags(), ["work".to_string()]);

        // Trimming happens before the duplicate check
        assert!(!session.add_tag("  work  "));
        assert!(session.add_tag("Work"));
        assert_eq!(session.tags().len(), 2);
    }

    #[test]
    fn remove_tag_uses_exact_equality() {
        let mut session = EditorSession::new_note();
        session.add_tag("alpha");
        let mut store = NoteStore::new();
        session.save(&mut store);

        assert!(!session.remove_tag("Alpha"));
        assert!(!session.has_unsaved_changes());

        assert!(session.remove_tag("alpha"));
        assert!(session.tags().is_empty());
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn delete_requires_an_existing_binding() {
        let mut store = NoteStore::new();
        let session = EditorSession::new_note();
        assert!(session.delete(&mut store).is_err());

        let note = store.add(NoteDraft::default());
        let session = EditorSession::open(&store, &note.id).unwrap();
        session.delete(&mut store).unwrap();
        assert!(store.is_empty());
    }
}
