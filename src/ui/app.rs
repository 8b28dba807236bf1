//! Application state and rendering. One screen (the book table) plus modal
//! form popups; the only modal state besides "adding a book" is which book,
//! if any, is currently selected for editing. All remote work goes through
//! the [`BookStore`], which guarantees the table only ever shows confirmed
//! records.

use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::models::Book;
use crate::store::BookStore;

use super::forms::{BookField, BookForm};
use super::helpers::{centered_rect, surface_error};

/// Footer space reserved for the status line and key hints.
const FOOTER_HEIGHT: u16 = 3;
/// How far PageUp/PageDown jump the selection.
const PAGE_JUMP: isize = 5;

/// Fine-grained modes layered over the table screen. Keeping this explicit
/// makes it easy to reason about which popup is rendered and where key
/// presses go.
enum Mode {
    Normal,
    AddingBook(BookForm),
    EditingBook { id: i64, form: BookForm },
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: BookStore,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: BookStore) -> Self {
        Self {
            store,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Hydrate the table from the remote collection at startup. A failure is
    /// reported in the footer and leaves the list empty; it never aborts the
    /// app, since the user can retry with the reload key once the server is
    /// back.
    pub fn initial_load(&mut self) {
        match self.store.load() {
            Ok(count) => {
                self.set_status(format!("Loaded {}.", plural_books(count)), StatusKind::Info);
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::EditingBook { id, form } => self.handle_edit_book(code, id, form),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_JUMP),
            KeyCode::PageDown => self.move_selection(PAGE_JUMP),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if let Some(book) = self.current_book().cloned() {
                    self.clear_status();
                    return Ok(Mode::EditingBook {
                        id: book.id,
                        form: BookForm::from_book(&book),
                    });
                } else {
                    self.set_status("No book selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') => {
                if let Some(book) = self.current_book().cloned() {
                    self.delete_book(&book);
                } else {
                    self.set_status("No book selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reload_books();
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                // Closing the popup discards the field state, which is the
                // "clear the entry form on success" behavior.
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingBook(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_edit_book(&mut self, code: KeyCode, id: i64, mut form: BookForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_book(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::EditingBook { id, form }
        } else {
            Mode::Normal
        }
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        let created = self.store.create(draft)?;
        self.focus_book(created.id);
        self.set_status(format!("Added {created}."), StatusKind::Info);
        Ok(())
    }

    fn save_existing_book(&mut self, id: i64, form: &BookForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        let book = Book {
            id,
            title: draft.title,
            author: draft.author,
            pages: draft.pages,
        };
        let summary = book.to_string();
        self.store.update(book)?;
        self.set_status(format!("Updated {summary}."), StatusKind::Info);
        Ok(())
    }

    /// Delete the given book with no confirmation step; the remote call must
    /// succeed before the row disappears.
    fn delete_book(&mut self, book: &Book) {
        match self.store.remove(book.id) {
            Ok(()) => {
                self.clamp_selection();
                self.set_status(format!("Deleted {book}."), StatusKind::Info);
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    /// Re-fetch the whole collection on demand. Keeps the current row focused
    /// when it survives the reload.
    fn reload_books(&mut self) {
        let focused = self.current_book().map(|book| book.id);
        match self.store.load() {
            Ok(count) => {
                if let Some(id) = focused {
                    self.focus_book(id);
                } else {
                    self.clamp_selection();
                }
                self.set_status(format!("Loaded {}.", plural_books(count)), StatusKind::Info);
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn current_book(&self) -> Option<&Book> {
        self.store.get(self.selected)
    }

    /// Point the selection at the book with the given id, falling back to a
    /// clamp when it is not in the sequence.
    fn focus_book(&mut self, id: i64) {
        match self.store.position_of(id) {
            Some(index) => self.selected = index,
            None => self.clamp_selection(),
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.store.len() {
            self.selected = self.store.len().saturating_sub(1);
        }
    }

    fn move_selection(&mut self, offset: isize) {
        if self.store.is_empty() {
            return;
        }
        let last = (self.store.len() - 1) as isize;
        let target = (self.selected as isize + offset).clamp(0, last);
        self.selected = target as usize;
    }

    fn select_first(&mut self) {
        self.selected = 0;
    }

    fn select_last(&mut self) {
        self.selected = self.store.len().saturating_sub(1);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_book_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, "Add Book", form),
            Mode::EditingBook { form, .. } => self.draw_book_form(frame, area, "Edit Book", form),
            Mode::Normal => {}
        }
    }

    fn draw_book_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Books");

        if self.store.is_empty() {
            let message = Paragraph::new("No books yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["ID", "Title", "Author", "Pages"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let rows = self.store.books().iter().map(|book| {
            Row::new([
                book.id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.pages.to_string(),
            ])
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut table_state = TableState::default();
        table_state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Normal => Line::from(vec![
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            Mode::AddingBook(_) | Mode::EditingBook { .. } => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(60, 45, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Title", BookField::Title),
            form.build_line("Author", BookField::Author),
            form.build_line("Pages", BookField::Pages),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save - Tab to switch - Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            BookField::Title => ("Title: ", 0),
            BookField::Author => ("Author: ", 1),
            BookField::Pages => ("Pages: ", 2),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        let cursor_y = inner.y + row;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn plural_books(count: usize) -> String {
    if count == 1 {
        "1 book".to_string()
    } else {
        format!("{count} books")
    }
}
