//! Interactive terminal front end for quillnotes.
//!
//! One running process hosts the whole client: a list route and an editor
//! route, navigable back and forth, all against the session's in-memory
//! store. The editor route runs the auto-save scheduler and feeds the rich
//! text surface from line input.
use std::io::{stdout, Write};

use log::{debug, info};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Duration;

use crate::{
    parse_tags, render_share_text, share_note, share_text, AutosaveScheduler, Commands, Config,
    ConfirmOutcome, DeleteConfirm, EditorCommand, EditorSession, MarkupBackend, NoSharePlatform,
    NoteCard, NoteListView, NoteStore, QnError, Result, RichTextSurface, SaveOutcome,
    ShareOutcome, StyleKind,
};

type InputLines = Lines<BufReader<Stdin>>;

/// Where the app navigates next.
enum Route {
    List { search: Option<String> },
    Editor { id: Option<String> },
}

/// Interactive application - hosts the list and editor routes over one store
pub struct App {
    /// The note store for this session
    store: NoteStore,

    /// Card presentation for the list route
    list_view: NoteListView,

    /// Application configuration
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            store: NoteStore::new(),
            list_view: NoteListView::new(&config),
            config,
        }
    }

    /// Runs the app starting at the route implied by the CLI command.
    pub async fn run(&mut self, command: Option<Commands>) -> Result<()> {
        let mut route = match command {
            Some(Commands::List { search, json }) => {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(
                            &self.list_view.to_json(&self.store, search.as_deref().unwrap_or(""))
                        )?
                    );
                    return Ok(());
                }
                Route::List { search }
            }
            Some(Commands::Edit { id }) => Route::Editor { id },
            None => Route::List { search: None },
        };

        let mut lines = BufReader::new(stdin()).lines();

        loop {
            let next = match route {
                Route::List { search } => self.run_list(&mut lines, search).await?,
                Route::Editor { id } => self.run_editor(&mut lines, id).await?,
            };
            match next {
                Some(n) => route = n,
                None => break,
            }
        }

        info!("Session ended with {} notes in memory", self.store.len());
        Ok(())
    }

    // ----- list route -----

    async fn run_list(
        &mut self,
        lines: &mut InputLines,
        mut search: Option<String>,
    ) -> Result<Option<Route>> {
        loop {
            let query = search.clone().unwrap_or_default();
            let cards = self.list_view.cards(&self.store, &query);
            self.display_cards(&cards, &query);

            prompt("notes> ")?;
            let Some(line) = lines.next_line().await? else {
                return Ok(None);
            };
            let line = line.trim();
            let (command, rest) = split_command(line);

            match command {
                "" => {}
                "new" | "n" => return Ok(Some(Route::Editor { id: None })),
                "open" | "o" | "edit" | "e" => match self.store.find_by_id(rest) {
                    Some(_) => {
                        return Ok(Some(Route::Editor {
                            id: Some(rest.to_string()),
                        }))
                    }
                    None => println!("No note with id {}", rest),
                },
                "search" | "s" => search = Some(rest.to_string()),
                "clear" => search = None,
                "delete" | "d" => self.delete_from_list(lines, rest).await?,
                "share" => match self.store.find_by_id(rest) {
                    Some(note) => {
                        let outcome = share_note(&mut NoSharePlatform, note);
                        report_share(outcome);
                    }
                    None => println!("No note with id {}", rest),
                },
                "help" | "h" => print_list_help(),
                "quit" | "q" => return Ok(None),
                other => println!("Unknown command: {} (try 'help')", other),
            }
        }
    }

    async fn delete_from_list(&mut self, lines: &mut InputLines, id: &str) -> Result<()> {
        let Some(note) = self.store.find_by_id(id) else {
            println!("No note with id {}", id);
            return Ok(());
        };

        let mut modal = DeleteConfirm::new();
        modal.request(note);

        let outcome = self.prompt_confirm_delete(lines, &modal).await?;
        if let Some(note_id) = modal.resolve(outcome) {
            self.store.remove(&note_id);
            println!("Note deleted.");
        } else {
            println!("Deletion cancelled.");
        }
        Ok(())
    }

    /// Renders the confirmation modal as a y/N prompt. Anything other than an
    /// explicit yes or no counts as clicking outside the modal surface.
    async fn prompt_confirm_delete(
        &self,
        lines: &mut InputLines,
        modal: &DeleteConfirm,
    ) -> Result<ConfirmOutcome> {
        let title = modal.pending_title().unwrap_or("Untitled Note");
        println!("Delete this note? This action cannot be undone.");
        println!("\"{}\"", title);
        prompt("[y/N]: ")?;

        let Some(line) = lines.next_line().await? else {
            return Ok(ConfirmOutcome::Cancel);
        };
        Ok(match line.trim().to_lowercase().as_str() {
            "y" | "yes" => ConfirmOutcome::Confirm,
            "n" | "no" | "" => ConfirmOutcome::Cancel,
            _ => ConfirmOutcome::ClickOutside,
        })
    }

    fn display_cards(&self, cards: &[NoteCard], query: &str) {
        if cards.is_empty() {
            println!("No notes found");
            if query.is_empty() {
                println!("Create your first note to get started ('new')");
            } else {
                println!("Try adjusting your search terms (searching: \"{}\")", query);
            }
            return;
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, card) in cards.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            println!(
                "{}  {}",
                console::style(&card.title).bold(),
                console::style(format!("({})", card.id)).dim()
            );

            if !card.tags.is_empty() {
                let mut tags = card
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");
                if card.more_tags > 0 {
                    tags.push_str(&format!(" +{}", card.more_tags));
                }
                println!("{}", console::style(tags).cyan());
            }

            if !card.preview.is_empty() {
                println!("{}", card.preview);
            }
            println!("{}", console::style(format!("edited {}", card.last_edited)).dim());
        }

        println!(
            "\n{} note{}",
            cards.len(),
            if cards.len() == 1 { "" } else { "s" }
        );
    }

    // ----- editor route -----

    async fn run_editor(
        &mut self,
        lines: &mut InputLines,
        id: Option<String>,
    ) -> Result<Option<Route>> {
        let mut session = match id {
            Some(id) => match EditorSession::open(&self.store, &id) {
                Ok(session) => session,
                Err(QnError::NoteNotFound { id }) => {
                    println!("No note with id {}", id);
                    return Ok(Some(Route::List { search: None }));
                }
                Err(e) => return Err(e),
            },
            None => EditorSession::new_note(),
        };

        let mut surface = RichTextSurface::new(MarkupBackend::new());
        surface.sync(session.content());

        let (mut scheduler, mut save_rx) =
            AutosaveScheduler::start(Duration::from_millis(self.config.autosave_delay_ms));

        println!(
            "Editing \"{}\" - type to append, ':help' for commands",
            if session.title().is_empty() {
                "Untitled Note"
            } else {
                session.title()
            }
        );

        let next = loop {
            prompt("edit> ")?;
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        // stdin closed: flush any pending work and leave
                        if session.has_unsaved_changes() {
                            self.perform_save(&mut session);
                        }
                        break None;
                    };
                    if let Some(next) = self
                        .handle_editor_line(lines, &mut session, &mut surface, &scheduler, &line)
                        .await?
                    {
                        break next;
                    }
                }
                Some(()) = save_rx.recv() => {
                    if self.config.autosave && session.has_unsaved_changes() {
                        self.perform_save(&mut session);
                        println!("{}", console::style(session.status_line()).dim());
                    }
                }
            }
        };

        scheduler.stop().await?;
        Ok(next)
    }

    /// Dispatches one line of editor input. `Ok(Some(next))` leaves the
    /// editor; `Ok(None)` keeps the session running.
    async fn handle_editor_line(
        &mut self,
        lines: &mut InputLines,
        session: &mut EditorSession,
        surface: &mut RichTextSurface<MarkupBackend>,
        scheduler: &AutosaveScheduler,
        line: &str,
    ) -> Result<Option<Option<Route>>> {
        let trimmed = line.trim_end();

        if !trimmed.starts_with(':') {
            // Plain text flows into the surface and back into the draft
            surface.type_text(&format!("{}\n", trimmed));
            session.set_content(surface.markup().to_string());
            self.edited(scheduler).await?;
            return Ok(None);
        }

        let (command, rest) = split_command(&trimmed[1..]);
        match command {
            "title" | "t" => {
                session.set_title(rest.to_string());
                self.edited(scheduler).await?;
            }
            "tag" => {
                let mut added = false;
                for tag in parse_tags(Some(rest.to_string())) {
                    added |= session.add_tag(&tag);
                }
                if added {
                    self.edited(scheduler).await?;
                } else {
                    debug!("Rejected tag submission: {:?}", rest);
                }
            }
            "untag" => {
                if session.remove_tag(rest) {
                    self.edited(scheduler).await?;
                }
            }
            "style" => match rest.parse::<StyleKind>() {
                Ok(style) => {
                    surface.apply(EditorCommand::Toggle(style));
                    session.set_content(surface.markup().to_string());
                    self.edited(scheduler).await?;
                }
                Err(e) => println!("{}", e),
            },
            "check" => {
                surface.apply(EditorCommand::InsertChecklist);
                session.set_content(surface.markup().to_string());
                self.edited(scheduler).await?;
            }
            "undo" => {
                surface.apply(EditorCommand::Undo);
                session.set_content(surface.markup().to_string());
                self.edited(scheduler).await?;
            }
            "redo" => {
                surface.apply(EditorCommand::Redo);
                session.set_content(surface.markup().to_string());
                self.edited(scheduler).await?;
            }
            "styles" => {
                surface.selection_changed();
                let mut active: Vec<&str> = surface
                    .active_styles()
                    .iter()
                    .map(StyleKind::as_str)
                    .collect();
                active.sort_unstable();
                println!(
                    "Active styles: {}",
                    if active.is_empty() {
                        "(none)".to_string()
                    } else {
                        active.join(", ")
                    }
                );
            }
            "tags" => {
                println!("Tags: {}", session.tags().join(", "));
            }
            "status" => {
                println!("{}", session.status_line());
            }
            "save" | "w" => {
                scheduler.cancel_pending().await?;
                self.perform_save(session);
                println!("{}", session.status_line());
            }
            "share" => {
                let text = render_share_text(session.title(), session.content());
                let display = if session.title().is_empty() {
                    "Untitled Note"
                } else {
                    session.title()
                };
                report_share(share_text(&mut NoSharePlatform, display, text));
            }
            "delete" => {
                let Some(id) = session.note_id().map(str::to_string) else {
                    println!("Nothing to delete: this note has not been saved yet");
                    return Ok(None);
                };
                let Some(note) = self.store.find_by_id(&id) else {
                    println!("No note with id {}", id);
                    return Ok(None);
                };

                let mut modal = DeleteConfirm::new();
                modal.request(note);
                let outcome = self.prompt_confirm_delete(lines, &modal).await?;
                if modal.resolve(outcome).is_some() {
                    scheduler.cancel_pending().await?;
                    session.delete(&mut self.store)?;
                    println!("Note deleted.");
                    return Ok(Some(Some(Route::List { search: None })));
                }
                println!("Deletion cancelled.");
            }
            "close" | "q" => {
                if self.confirm_discard(lines, session, scheduler).await? {
                    return Ok(Some(Some(Route::List { search: None })));
                }
            }
            "quit" => {
                if self.confirm_discard(lines, session, scheduler).await? {
                    return Ok(Some(None));
                }
            }
            "help" | "h" => print_editor_help(),
            other => println!("Unknown command: :{} (try ':help')", other),
        }

        Ok(None)
    }

    /// Navigation guard: prompts when the draft has unsaved changes.
    /// Returns whether leaving may proceed.
    async fn confirm_discard(
        &self,
        lines: &mut InputLines,
        session: &EditorSession,
        scheduler: &AutosaveScheduler,
    ) -> Result<bool> {
        if !session.needs_close_confirmation() {
            return Ok(true);
        }

        prompt("You have unsaved changes. Are you sure you want to leave? [y/N]: ")?;
        let Some(line) = lines.next_line().await? else {
            return Ok(true);
        };
        if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
            // The in-flight debounce dies with the draft
            scheduler.cancel_pending().await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn edited(&self, scheduler: &AutosaveScheduler) -> Result<()> {
        if self.config.autosave {
            scheduler.note_edited().await?;
        }
        Ok(())
    }

    fn perform_save(&mut self, session: &mut EditorSession) {
        match session.save(&mut self.store) {
            SaveOutcome::Created(id) => println!("Created note {}", id),
            SaveOutcome::Updated => debug!("Updated note in place"),
        }
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    stdout().flush()?;
    Ok(())
}

fn report_share(outcome: ShareOutcome) {
    match outcome {
        ShareOutcome::Shared => println!("Note shared."),
        ShareOutcome::CopiedToClipboard => println!("Note copied to clipboard!"),
        ShareOutcome::Rendered(text) => {
            println!("Sharing unavailable; copy it yourself:\n\n{}", text);
        }
    }
}

fn print_list_help() {
    println!("Commands:");
    println!("  new                start a new note");
    println!("  open <id>          open a note in the editor");
    println!("  search <text>      filter by title, content, or tag");
    println!("  clear              clear the search filter");
    println!("  delete <id>        delete a note (asks for confirmation)");
    println!("  share <id>         share a note (clipboard fallback)");
    println!("  quit               leave");
}

fn print_editor_help() {
    println!("Type plain text to append to the note. Commands:");
    println!("  :title <text>      set the note title");
    println!("  :tag <t> / :untag <t>   add or remove a tag");
    println!("  :style <name>      toggle bold, italic, underline, strikethrough,");
    println!("                     bullets, numbers, heading, highlight, align-*");
    println!("  :check             insert a checklist item");
    println!("  :undo / :redo      walk the edit history");
    println!("  :styles            show styles active at the caret");
    println!("  :save              save now (auto-save also runs)");
    println!("  :share             share this note");
    println!("  :delete            delete this note");
    println!("  :close             back to the list");
    println!("  :quit              leave the app");
}
