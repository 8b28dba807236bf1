//! Core library surface for the Bookshelf Manager TUI application.
//!
//! The public modules exposed here keep the API intentionally small so the
//! `bin` target and the integration tests can reuse the same pieces: the
//! remote API client, the store that mirrors the remote collection, and the
//! interactive front-end.
pub mod api;
pub mod config;
pub mod models;
pub mod store;
pub mod ui;

/// Endpoint resolution used by `main.rs` before anything else starts.
pub use config::{load_config, Config};

/// The remote-access handle and its error taxonomy.
pub use api::{ApiClient, ApiError};

/// The two domain types that other layers manipulate.
pub use models::{Book, BookDraft};

/// The client-side mirror of the remote collection.
pub use store::BookStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
