use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, BookDraft};

/// Transient input state shared by the entry form and the edit form. Holds
/// raw text for every field so the user can backspace freely; typed values
/// only exist once [`BookForm::parse_inputs`] succeeds.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) pages: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in focus order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BookField {
    Title,
    Author,
    Pages,
}

impl Default for BookField {
    fn default() -> Self {
        BookField::Title
    }
}

impl BookForm {
    /// Populate the form from an existing book when entering edit mode.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            pages: book.pages.to_string(),
            active: BookField::Title,
            error: None,
        }
    }

    /// Cycle focus forward across the three fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Pages,
            BookField::Pages => BookField::Title,
        };
    }

    /// Cycle focus backward.
    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Pages,
            BookField::Author => BookField::Title,
            BookField::Pages => BookField::Author,
        };
    }

    /// Append a character to the active field. Pages accepts digits only, so
    /// a negative sign or letter never reaches validation in the first place.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Title => {
                if ch.is_control() {
                    return false;
                }
                self.title.push(ch);
                true
            }
            BookField::Author => {
                if ch.is_control() {
                    return false;
                }
                self.author.push(ch);
                true
            }
            BookField::Pages => {
                if ch.is_ascii_digit() {
                    self.pages.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Pages => {
                self.pages.pop();
            }
        }
    }

    /// Validate the inputs and return a typed draft ready for the store. All
    /// three fields are required; pages must parse as a whole number.
    pub(crate) fn parse_inputs(&self) -> Result<BookDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Title is required."));
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(anyhow!("Author is required."));
        }
        let pages_raw = self.pages.trim();
        if pages_raw.is_empty() {
            return Err(anyhow!("Page count is required."));
        }
        let pages = pages_raw
            .parse::<u32>()
            .context("Page count must be a whole number.")?;

        Ok(BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            pages,
        })
    }

    /// Render a styled line for the modal form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let (value, is_active) = (self.value(field), self.active == field);

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Pages => &self.pages,
        }
    }
}
