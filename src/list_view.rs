//! Note list view.
//!
//! Builds presentational card summaries from the filtered store contents and
//! brokers per-note actions back to the caller. Rendering to the terminal
//! lives in the CLI layer; this view only shapes the data.
use serde_json::json;

use crate::{content_preview, format_relative_time, Config, NoteStore};

/// One note's card summary, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: String,
    pub title: String,
    pub preview: String,
    /// Tags shown on the card, capped by config
    pub tags: Vec<String>,
    /// How many tags were folded into the "+N" overflow marker
    pub more_tags: usize,
    pub last_edited: String,
}

/// Presents the store's contents filtered by a search string.
pub struct NoteListView {
    preview_length: usize,
    card_tag_limit: usize,
}

impl NoteListView {
    pub fn new(config: &Config) -> Self {
        Self {
            preview_length: config.preview_length,
            card_tag_limit: config.card_tag_limit,
        }
    }

    /// Cards for every note passing the filter, in store order.
    pub fn cards(&self, store: &NoteStore, query: &str) -> Vec<NoteCard> {
        store
            .filter(query)
            .into_iter()
            .map(|note| {
                let shown = note.tags.iter().take(self.card_tag_limit).cloned().collect();
                NoteCard {
                    id: note.id.clone(),
                    title: note.display_title().to_string(),
                    preview: content_preview(&note.content, self.preview_length),
                    tags: shown,
                    more_tags: note.tags.len().saturating_sub(self.card_tag_limit),
                    last_edited: format_relative_time(note.updated_at),
                }
            })
            .collect()
    }

    /// JSON rendering of the filtered notes for machine consumers.
    pub fn to_json(&self, store: &NoteStore, query: &str) -> serde_json::Value {
        let notes: Vec<serde_json::Value> = store
            .filter(query)
            .into_iter()
            .map(|note| {
                json!({
                    "id": note.id,
                    "title": note.title,
                    "tags": note.tags,
                    "created_at": note.created_at,
                    "updated_at": note.updated_at.to_rfc3339(),
                })
            })
            .collect();
        serde_json::Value::Array(notes)
    }
}

#[cfg(test)]
mod tests {
    use crate::NoteDraft;

    use super::*;

    fn view() -> NoteListView {
        NoteListView::new(&Config::default())
    }

    fn store_with(notes: &[(&str, &str, &[&str])]) -> NoteStore {
        let mut store = NoteStore::new();
        for (title, content, tags) in notes {
            store.add(NoteDraft {
                title: title.to_string(),
                content: content.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            });
        }
        store
    }

    #[test]
    fn cards_follow_the_search_filter() {
        let store = store_with(&[
            ("Shopping", "", &[]),
            ("Work", "", &["urgent"]),
        ]);

        let cards = view().cards(&store, "urg");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Work");

        assert_eq!(view().cards(&store, "").len(), 2);
        assert!(view().cards(&store, "zzz").is_empty());
    }

    #[test]
    fn card_preview_strips_markup_and_truncates() {
        let long_body = format!("<b>{}</b>", "y".repeat(300));
        let store = store_with(&[("Long", long_body.as_str(), &[])]);

        let cards = view().cards(&store, "");
        assert!(cards[0].preview.ends_with("..."));
        assert!(!cards[0].preview.contains('<'));
        assert_eq!(cards[0].preview.chars().count(), 153);
    }

    #[test]
    fn untitled_notes_get_the_placeholder_title() {
        let store = store_with(&[("", "body", &[])]);
        assert_eq!(view().cards(&store, "")[0].title, "Untitled Note");
    }

    #[test]
    fn card_tags_overflow_into_a_count() {
        let store = store_with(&[("Tagged", "", &["a", "b", "c", "d", "e"])]);

        let cards = view().cards(&store, "");
        assert_eq!(cards[0].tags, vec!["a", "b", "c"]);
        assert_eq!(cards[0].more_tags, 2);
    }

    #[test]
    fn json_output_lists_filtered_notes() {
        let store = store_with(&[("Only", "", &[])]);
        let value = view().to_json(&store, "");

        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["title"], "Only");
    }
}
