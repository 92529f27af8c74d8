//! In-memory storage for notes.
//!
//! The store is the single source of truth for all notes in a running
//! session. It is constructed once at startup and handed to the views by
//! reference; nothing here touches disk or network, so every operation is
//! synchronous and atomic with respect to the app task.
use chrono::Utc;
use log::{debug, info, warn};

use crate::{strip_markup, Note, NoteDraft, NoteUpdate};

/// Owns the canonical note records for the running session.
///
/// Notes are kept most-recently-created-first; updates never reorder. Lookup,
/// update, and delete are linear scans, which is the right trade at the scale
/// of a single client's notes.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    next_seq: u64,
}

impl NoteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a note from the draft and inserts it at the front.
    ///
    /// The store allocates the id and stamps `created_at == updated_at`.
    /// Returns a clone of the stored note so the caller can rebind to it.
    pub fn add(&mut self, draft: NoteDraft) -> Note {
        let now = Utc::now();
        let note = Note {
            id: self.next_id(),
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };

        info!("Created note {}", note.id);
        self.notes.insert(0, note.clone());
        note
    }

    /// Merges the given fields into the note with `id` and refreshes its
    /// `updated_at`. A missing id is a silent no-op; a stale id is worth
    /// seeing in diagnostics, so it is logged.
    pub fn update(&mut self, id: &str, update: NoteUpdate) {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                if let Some(title) = update.title {
                    note.title = title;
                }
                if let Some(content) = update.content {
                    note.content = content;
                }
                if let Some(tags) = update.tags {
                    note.tags = tags;
                }
                note.updated_at = Utc::now();
                debug!("Updated note {}", id);
            }
            None => warn!("Ignoring update for unknown note {}", id),
        }
    }

    /// Removes the note with `id` if present; no-op otherwise.
    pub fn remove(&mut self, id: &str) {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() < before {
            info!("Deleted note {}", id);
        }
    }

    /// Looks up a note by id, used for editor hydration.
    pub fn find_by_id(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// All notes in store order (most recently created first).
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Notes passing the search filter, in store order.
    ///
    /// A note matches when the query is empty, or when the lowercase query is
    /// a substring of the lowercase title, the lowercase markup-stripped
    /// content, or one of the lowercase tags.
    pub fn filter(&self, query: &str) -> Vec<&Note> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.notes.iter().collect();
        }

        self.notes
            .iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&query)
                    || strip_markup(&note.content).to_lowercase().contains(&query)
                    || note.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    // Timestamp plus a per-store sequence, so notes created in the same
    // millisecond still get distinct ids.
    fn next_id(&mut self) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("{}-{}", Utc::now().timestamp_millis(), seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, content: &str, tags: &[&str]) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn add_stamps_timestamps_and_inserts_at_front() {
        let mut store = NoteStore::new();
        let first = store.add(draft("First", "", &[]));
        let second = store.add(draft("Second", "", &[]));

        assert_eq!(first.created_at, first.updated_at);
        assert_ne!(first.id, second.id);
        assert_eq!(store.list()[0].id, second.id);
        assert_eq!(store.list()[1].id, first.id);
    }

    #[test]
    fn ids_are_unique_within_a_burst() {
        let mut store = NoteStore::new();
        let ids: Vec<String> = (0..20).map(|_| store.add(NoteDraft::default()).id).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn update_merges_fields_and_preserves_created_at() {
        let mut store = NoteStore::new();
        let note = store.add(draft("Title", "body", &["keep"]));

        store.update(
            &note.id,
            NoteUpdate {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        );

        let updated = store.find_by_id(&note.id).unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, "body");
        assert_eq!(updated.tags, vec!["keep"]);
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
    }

    #[test]
    fn update_does_not_reorder() {
        let mut store = NoteStore::new();
        let older = store.add(draft("Older", "", &[]));
        let newer = store.add(draft("Newer", "", &[]));

        store.update(&older.id, NoteUpdate::full("Edited".into(), String::new(), Vec::new()));

        assert_eq!(store.list()[0].id, newer.id);
        assert_eq!(store.list()[1].id, older.id);
    }

    #[test]
    fn update_on_unknown_id_is_a_noop() {
        let mut store = NoteStore::new();
        store.add(draft("Only", "", &[]));
        let snapshot: Vec<String> = store.list().iter().map(|n| n.id.clone()).collect();

        store.update("missing", NoteUpdate::full("x".into(), "y".into(), Vec::new()));

        let after: Vec<String> = store.list().iter().map(|n| n.id.clone()).collect();
        assert_eq!(snapshot, after);
        assert_eq!(store.list()[0].title, "Only");
    }

    #[test]
    fn remove_then_find_yields_absence() {
        let mut store = NoteStore::new();
        let note = store.add(draft("Doomed", "", &[]));
        assert_eq!(store.len(), 1);

        store.remove(&note.id);
        assert!(store.find_by_id(&note.id).is_none());
        assert_eq!(store.len(), 0);

        // Removing again is a no-op
        store.remove(&note.id);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn filter_matches_title_content_and_tags() {
        let mut store = NoteStore::new();
        store.add(draft("Shopping", "", &[]));
        store.add(draft("Work", "", &["urgent"]));

        let hits = store.filter("urg");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Work");

        assert_eq!(store.filter("").len(), 2);
        assert!(store.filter("zzz").is_empty());
    }

    #[test]
    fn filter_is_case_insensitive_and_strips_markup() {
        let mut store = NoteStore::new();
        store.add(draft("", "<b>Grocery</b> run", &[]));

        assert_eq!(store.filter("GROCERY").len(), 1);
        // The markup tag itself is not searchable text
        assert!(store.filter("<b>").is_empty());
    }
}
