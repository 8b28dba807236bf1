//! Remote collection access split across logical submodules.

mod books;
mod client;

pub use books::{create_book, delete_book, fetch_books, update_book};
pub use client::{ApiClient, ApiError};
