//! Rich text surface.
//!
//! Wraps an editable text region behind a small command/query capability so
//! the editor-state logic stays independent of which rich-text primitive
//! renders it. The surface keeps the caller-supplied markup string
//! synchronized with the region and reports the active style set after every
//! content or selection change. No parser, no AST: the markup string is the
//! only representation, opaque to the rest of the system.
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::QnError;

/// Styles the surface can report as active at the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    UnorderedList,
    OrderedList,
    Heading,
    Highlight,
    AlignLeft,
    AlignCenter,
    AlignRight,
}

impl StyleKind {
    pub const ALL: [StyleKind; 11] = [
        StyleKind::Bold,
        StyleKind::Italic,
        StyleKind::Underline,
        StyleKind::Strikethrough,
        StyleKind::UnorderedList,
        StyleKind::OrderedList,
        StyleKind::Heading,
        StyleKind::Highlight,
        StyleKind::AlignLeft,
        StyleKind::AlignCenter,
        StyleKind::AlignRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKind::Bold => "bold",
            StyleKind::Italic => "italic",
            StyleKind::Underline => "underline",
            StyleKind::Strikethrough => "strikethrough",
            StyleKind::UnorderedList => "bullets",
            StyleKind::OrderedList => "numbers",
            StyleKind::Heading => "heading",
            StyleKind::Highlight => "highlight",
            StyleKind::AlignLeft => "align-left",
            StyleKind::AlignCenter => "align-center",
            StyleKind::AlignRight => "align-right",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleKind {
    type Err = QnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleKind::ALL
            .iter()
            .find(|style| style.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| QnError::EditorError {
                message: format!("Unknown style: {}", s),
            })
    }
}

/// Everything the toolbar can execute against the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Toggle(StyleKind),
    InsertChecklist,
    Undo,
    Redo,
}

/// The native rich-text primitive the surface delegates to.
///
/// Implementations execute commands and answer style queries however the
/// host environment does; the surface never inspects the markup itself.
pub trait RichTextBackend {
    /// Executes a toolbar command against the region.
    fn exec(&mut self, command: EditorCommand);

    /// Whether the given style is active at the current caret position.
    fn query_state(&self, style: StyleKind) -> bool;

    /// Types text into the region at the insertion point.
    fn insert_text(&mut self, text: &str);

    /// Replaces the region's displayed content.
    fn set_markup(&mut self, markup: &str);

    /// The region's current serialized markup.
    fn markup(&self) -> &str;
}

/// Keeps a markup string synchronized with an editable region and tracks the
/// active style set for toolbar highlighting.
pub struct RichTextSurface<B> {
    backend: B,
    markup: String,
    active: HashSet<StyleKind>,
}

impl<B: RichTextBackend> RichTextSurface<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            markup: String::new(),
            active: HashSet::new(),
        }
    }

    /// Pushes caller-supplied markup into the region when it differs from
    /// what is displayed, e.g. on editor hydration.
    pub fn sync(&mut self, markup: &str) {
        if self.backend.markup() != markup {
            self.backend.set_markup(markup);
            self.markup = markup.to_string();
            self.refresh_styles();
        }
    }

    /// The current serialized markup of the region.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Executes a toolbar command and picks up the resulting content and
    /// style changes.
    pub fn apply(&mut self, command: EditorCommand) {
        self.backend.exec(command);
        self.pull();
    }

    /// Types text into the region, as the host's input events would.
    pub fn type_text(&mut self, text: &str) {
        self.backend.insert_text(text);
        self.pull();
    }

    /// Re-queries the style set after a caret or selection move.
    pub fn selection_changed(&mut self) {
        self.refresh_styles();
    }

    /// The set of styles active at the caret, for toolbar highlighting.
    pub fn active_styles(&self) -> &HashSet<StyleKind> {
        &self.active
    }

    fn pull(&mut self) {
        self.markup = self.backend.markup().to_string();
        self.refresh_styles();
    }

    fn refresh_styles(&mut self) {
        self.active = StyleKind::ALL
            .iter()
            .copied()
            .filter(|style| self.backend.query_state(*style))
            .collect();
    }
}

/// Terminal-host backend: an append-at-caret region with toggle tracking.
///
/// Toggling a style emits its open or close marker at the insertion point
/// and flips the toggle used to answer state queries. A short snapshot
/// history backs undo/redo. The markup produced here is consumed only by
/// `strip_markup` and the surface itself.
#[derive(Debug, Default)]
pub struct MarkupBackend {
    content: String,
    open: Vec<StyleKind>,
    history: Vec<String>,
    redo: Vec<String>,
}

impl MarkupBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&mut self) {
        self.history.push(self.content.clone());
        self.redo.clear();
    }

    fn open_marker(style: StyleKind) -> &'static str {
        match style {
            StyleKind::Bold => "<b>",
            StyleKind::Italic => "<i>",
            StyleKind::Underline => "<u>",
            StyleKind::Strikethrough => "<strike>",
            StyleKind::UnorderedList => "<ul>",
            StyleKind::OrderedList => "<ol>",
            StyleKind::Heading => "<h2>",
            StyleKind::Highlight => "<mark>",
            StyleKind::AlignLeft => "<div align=\"left\">",
            StyleKind::AlignCenter => "<div align=\"center\">",
            StyleKind::AlignRight => "<div align=\"right\">",
        }
    }

    fn close_marker(style: StyleKind) -> &'static str {
        match style {
            StyleKind::Bold => "</b>",
            StyleKind::Italic => "</i>",
            StyleKind::Underline => "</u>",
            StyleKind::Strikethrough => "</strike>",
            StyleKind::UnorderedList => "</ul>",
            StyleKind::OrderedList => "</ol>",
            StyleKind::Heading => "</h2>",
            StyleKind::Highlight => "</mark>",
            StyleKind::AlignLeft | StyleKind::AlignCenter | StyleKind::AlignRight => "</div>",
        }
    }
}

impl RichTextBackend for MarkupBackend {
    fn exec(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Toggle(style) => {
                self.snapshot();
                if let Some(pos) = self.open.iter().position(|s| *s == style) {
                    self.open.remove(pos);
                    self.content.push_str(Self::close_marker(style));
                } else {
                    self.open.push(style);
                    self.content.push_str(Self::open_marker(style));
                }
            }
            EditorCommand::InsertChecklist => {
                self.snapshot();
                self.content.push_str("<input type=\"checkbox\"> ");
            }
            EditorCommand::Undo => {
                if let Some(previous) = self.history.pop() {
                    self.redo.push(std::mem::replace(&mut self.content, previous));
                }
            }
            EditorCommand::Redo => {
                if let Some(next) = self.redo.pop() {
                    self.history.push(std::mem::replace(&mut self.content, next));
                }
            }
        }
    }

    fn query_state(&self, style: StyleKind) -> bool {
        self.open.contains(&style)
    }

    fn insert_text(&mut self, text: &str) {
        self.snapshot();
        self.content.push_str(text);
    }

    fn set_markup(&mut self, markup: &str) {
        self.content = markup.to_string();
        self.open.clear();
        self.history.clear();
        self.redo.clear();
    }

    fn markup(&self) -> &str {
        &self.content
    }
}
