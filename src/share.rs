//! Best-effort note sharing.
//!
//! Sharing degrades gracefully: the platform share hook first, the system
//! clipboard second, and finally the rendered text is handed back to the
//! caller for display. None of the channels failing is a hard error.
use log::{debug, warn};

use crate::{strip_markup, Note, QnError, Result};

/// Platform share capability, e.g. a native share sheet.
pub trait SharePlatform {
    fn share(&mut self, title: &str, text: &str) -> Result<()>;
}

/// A host with no share capability; always defers to the fallbacks.
pub struct NoSharePlatform;

impl SharePlatform for NoSharePlatform {
    fn share(&mut self, _title: &str, _text: &str) -> Result<()> {
        Err(QnError::ShareFailed {
            message: "No platform share capability".to_string(),
        })
    }
}

/// How a share request was ultimately delivered.
#[derive(Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform share hook took it
    Shared,
    /// Copied to the system clipboard
    CopiedToClipboard,
    /// Every channel failed; here is the text to show instead
    Rendered(String),
}

/// Plain-text rendering for sharing: title, blank line, then the
/// markup-stripped content.
pub fn render_share_text(title: &str, content: &str) -> String {
    format!("{}\n\n{}", title, strip_markup(content))
}

/// Shares already-rendered text through the first channel that works.
pub fn share_text<P: SharePlatform>(
    platform: &mut P,
    display_title: &str,
    text: String,
) -> ShareOutcome {
    match platform.share(display_title, &text) {
        Ok(()) => {
            debug!("Shared \"{}\" via platform", display_title);
            return ShareOutcome::Shared;
        }
        Err(e) => debug!("Platform share unavailable: {}", e),
    }

    match copy_to_clipboard(&text) {
        Ok(()) => ShareOutcome::CopiedToClipboard,
        Err(e) => {
            warn!("Clipboard copy failed: {}", e);
            ShareOutcome::Rendered(text)
        }
    }
}

/// Shares a stored note.
pub fn share_note<P: SharePlatform>(platform: &mut P, note: &Note) -> ShareOutcome {
    let text = render_share_text(&note.title, &note.content);
    share_text(platform, note.display_title(), text)
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| QnError::ShareFailed {
        message: format!("Clipboard unavailable: {}", e),
    })?;
    clipboard.set_text(text).map_err(|e| QnError::ShareFailed {
        message: format!("Clipboard write failed: {}", e),
    })
}
