//! Domain records exchanged with the remote books service and passed
//! throughout the TUI. These stay plain data holders so the API layer and the
//! presentation code can focus on transport and rendering respectively. The
//! field names double as the JSON wire format, so renaming anything here is a
//! protocol change.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A book as the remote collection knows it. Instances only ever enter the
/// in-memory list after the server has confirmed them, so `id` is always a
/// server-assigned value.
pub struct Book {
    /// Identifier assigned by the remote collection. Edit and delete flows
    /// bubble this back to the API layer.
    pub id: i64,
    /// Title shown in the list view. Required on input.
    pub title: String,
    /// Author shown in the list view. Required on input.
    pub author: String,
    /// Page count. `u32` keeps the value non-negative by construction.
    pub pages: u32,
}

impl fmt::Display for Book {
    /// Render a short `Title by Author` summary. Status messages in the footer
    /// use this so they read naturally without repeating raw field names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Payload for creating a book. Deliberately has no `id` field: the server
/// assigns one and returns the full [`Book`].
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub pages: u32,
}
