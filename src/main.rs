//! Binary entry point that glues the remote book collection to the TUI. The
//! bootstrapping pipeline: resolve the endpoint, build the HTTP client and
//! the store, attempt the initial load (a failure only shows up in the
//! footer), then drive the Ratatui event loop until the user exits.
use bookshelf_manager::{load_config, run_app, ApiClient, App, BookStore};

/// Returning a `Result` bubbles fatal initialization problems (for example a
/// malformed config file) to the terminal instead of crashing silently. A
/// server that is merely unreachable is not fatal; the app starts with an
/// empty list and an error in the footer.
fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = ApiClient::new(&config)?;
    let store = BookStore::new(client);

    let mut app = App::new(store);
    app.initial_load();
    run_app(&mut app)
}
