//! The in-memory mirror of the remote collection. `BookStore` is the single
//! source of truth for what the table displays, and it enforces one rule
//! everywhere: the local sequence changes only after the remote call has
//! succeeded. A failed call leaves the sequence value-equal to what it was,
//! so the UI always shows the last known-good state.
//!
//! Mutations merge by id rather than re-fetching the whole collection: create
//! appends the server-returned record, update substitutes the matching entry,
//! remove drops it. Ids are trusted to be unique because the server assigns
//! them; duplicates are not deduplicated defensively.

use anyhow::{Context, Result};

use crate::api::{create_book, delete_book, fetch_books, update_book, ApiClient};
use crate::models::{Book, BookDraft};

pub struct BookStore {
    api: ApiClient,
    books: Vec<Book>,
}

impl BookStore {
    /// Start with an empty sequence; callers run [`BookStore::load`] to
    /// hydrate it. Starting empty means an initial load failure degrades to
    /// an empty list instead of aborting the app.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            books: Vec::new(),
        }
    }

    /// The current sequence, in server order for loads and append order for
    /// creates since the last load.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Index of the book with the given id, if it is in the sequence.
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    /// Fetch the full collection and replace the local sequence wholesale.
    /// On failure the previous sequence is kept. Returns how many records
    /// were fetched so the caller can report it.
    pub fn load(&mut self) -> Result<usize> {
        let fetched = fetch_books(&self.api).context("failed to load books")?;
        self.books = fetched;
        Ok(self.books.len())
    }

    /// Send a create request and, once the server confirms, append the record
    /// it returned. The returned clone carries the server-assigned id for
    /// status reporting and selection focus.
    pub fn create(&mut self, draft: BookDraft) -> Result<Book> {
        let created = create_book(&self.api, &draft).context("failed to add book")?;
        self.books.push(created.clone());
        Ok(created)
    }

    /// Send an update for a complete record and, once confirmed, substitute
    /// the matching local entry. An id with no local entry leaves the
    /// sequence alone; the UI only ever edits rows it is displaying.
    pub fn update(&mut self, book: Book) -> Result<()> {
        update_book(&self.api, &book).context("failed to update book")?;
        if let Some(index) = self.position_of(book.id) {
            self.books[index] = book;
        }
        Ok(())
    }

    /// Send a delete request and, once confirmed, drop the matching entry.
    /// Removing an id that is no longer present either fails remotely or
    /// no-ops locally; unrelated entries are never touched.
    pub fn remove(&mut self, id: i64) -> Result<()> {
        delete_book(&self.api, id).context("failed to delete book")?;
        self.books.retain(|book| book.id != id);
        Ok(())
    }
}
