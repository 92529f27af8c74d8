//! Delete confirmation, shared by the list view and the editor.
//!
//! A two-state modal capability: a delete request parks the candidate note
//! here until the user resolves it. Only a confirm outcome hands the note id
//! back to the caller for the actual delete; cancel and clicking outside the
//! modal surface dismiss with no side effect.
use crate::Note;

/// How the user resolved the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirm,
    Cancel,
    ClickOutside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteConfirm {
    Idle,
    Pending { note_id: String, title: String },
}

impl Default for DeleteConfirm {
    fn default() -> Self {
        DeleteConfirm::Idle
    }
}

impl DeleteConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a delete request for the given note. A newer request replaces
    /// any pending one.
    pub fn request(&mut self, note: &Note) {
        *self = DeleteConfirm::Pending {
            note_id: note.id.clone(),
            title: note.display_title().to_string(),
        };
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DeleteConfirm::Pending { .. })
    }

    /// The title to render in the modal, with the "Untitled Note" fallback
    /// already applied.
    pub fn pending_title(&self) -> Option<&str> {
        match self {
            DeleteConfirm::Pending { title, .. } => Some(title),
            DeleteConfirm::Idle => None,
        }
    }

    /// Resolves the modal. Returns the note id to delete on confirm, `None`
    /// otherwise; the modal is dismissed in every case.
    pub fn resolve(&mut self, outcome: ConfirmOutcome) -> Option<String> {
        let previous = std::mem::replace(self, DeleteConfirm::Idle);
        match (previous, outcome) {
            (DeleteConfirm::Pending { note_id, .. }, ConfirmOutcome::Confirm) => Some(note_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn confirm_hands_back_the_note_id_and_dismisses() {
        let mut modal = DeleteConfirm::new();
        modal.request(&note("n1", "Groceries"));

        assert!(modal.is_pending());
        assert_eq!(modal.pending_title(), Some("Groceries"));

        assert_eq!(modal.resolve(ConfirmOutcome::Confirm), Some("n1".to_string()));
        assert!(!modal.is_pending());
    }

    #[test]
    fn cancel_and_outside_click_dismiss_without_side_effect() {
        let mut modal = DeleteConfirm::new();

        modal.request(&note("n1", "A"));
        assert_eq!(modal.resolve(ConfirmOutcome::Cancel), None);
        assert!(!modal.is_pending());

        modal.request(&note("n1", "A"));
        assert_eq!(modal.resolve(ConfirmOutcome::ClickOutside), None);
        assert!(!modal.is_pending());
    }

    #[test]
    fn empty_titles_render_the_placeholder() {
        let mut modal = DeleteConfirm::new();
        modal.request(&note("n1", ""));
        assert_eq!(modal.pending_title(), Some("Untitled Note"));
    }

    #[test]
    fn a_newer_request_replaces_the_pending_one() {
        let mut modal = DeleteConfirm::new();
        modal.request(&note("n1", "First"));
        modal.request(&note("n2", "Second"));

        assert_eq!(modal.resolve(ConfirmOutcome::Confirm), Some("n2".to_string()));
    }

    #[test]
    fn resolving_an_idle_modal_does_nothing() {
        let mut modal = DeleteConfirm::new();
        assert_eq!(modal.resolve(ConfirmOutcome::Confirm), None);
    }
}
