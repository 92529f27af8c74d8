//! Shared types for the quillnotes application.
//!
//! This module contains the result alias, the editor save outcome, and the
//! CLI command surface.
use clap::Subcommand;

use crate::QnError;

/// A specialized Result type for quillnotes operations.
pub type Result<T> = std::result::Result<T, QnError>;

/// What a successful editor save did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new note was created; carries the id the store allocated
    Created(String),
    /// An existing note was updated in place
    Updated,
}

/// Initial route for the quillnotes session
#[derive(Subcommand)]
pub enum Commands {
    /// Open the note list, optionally pre-filtered by a search string
    List {
        /// Search string applied to titles, content, and tags
        #[clap(short, long)]
        search: Option<String>,

        /// Print the matching notes as JSON and exit
        #[clap(short, long)]
        json: bool,
    },

    /// Open the editor for a note, or start a new one when no id is given
    Edit {
        /// ID of the note to edit
        id: Option<String>,
    },
}
