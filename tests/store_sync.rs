//! Integration tests for the store's synchronization contract: the local
//! sequence changes only after the remote call succeeds, and failed calls
//! leave it value-equal to its pre-call state.
//!
//! Each test spins an in-process axum stub of the books service on an
//! ephemeral port and drives the blocking store against it. The stub keeps
//! its collection behind a mutex and carries a switch that makes every
//! handler answer HTTP 500, which is how the failure paths are exercised.

use std::net::TcpListener as StdTcpListener;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;

use bookshelf_manager::{ApiClient, ApiError, Book, BookDraft, BookStore};

// ============================================================================
// Stub server
// ============================================================================

#[derive(Default)]
struct StubService {
    books: Mutex<Vec<Book>>,
    next_id: AtomicI64,
    fail: AtomicBool,
}

impl StubService {
    fn seed(&self, books: Vec<Book>) {
        let max_id = books.iter().map(|book| book.id).max().unwrap_or(0);
        self.next_id.store(max_id, Ordering::SeqCst);
        *self.books.lock().unwrap() = books;
    }

    fn snapshot(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }

    /// Make every handler answer HTTP 500 until switched back.
    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }
}

/// Create payload as the real service accepts it: a book without an id.
#[derive(Deserialize)]
struct CreatePayload {
    title: String,
    author: String,
    pages: u32,
}

async fn list_books(State(service): State<Arc<StubService>>) -> Response {
    if service.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(service.snapshot()).into_response()
}

async fn create_book(
    State(service): State<Arc<StubService>>,
    Json(payload): Json<CreatePayload>,
) -> Response {
    if service.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let book = Book {
        id: service.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        title: payload.title,
        author: payload.author,
        pages: payload.pages,
    };
    service.books.lock().unwrap().push(book.clone());
    Json(book).into_response()
}

async fn update_book(
    State(service): State<Arc<StubService>>,
    Json(book): Json<Book>,
) -> Response {
    if service.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut books = service.books.lock().unwrap();
    match books.iter_mut().find(|existing| existing.id == book.id) {
        Some(existing) => {
            *existing = book.clone();
            Json(book).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_book(
    State(service): State<Arc<StubService>>,
    Path(id): Path<i64>,
) -> StatusCode {
    if service.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let mut books = service.books.lock().unwrap();
    let before = books.len();
    books.retain(|book| book.id != id);
    if books.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// Bind the stub to an ephemeral port and serve it from a background thread
/// with its own runtime, so the blocking client under test can run on the
/// test thread. Returns the collection URL plus a handle for seeding and
/// failure injection.
fn spawn_stub() -> (String, Arc<StubService>) {
    let service = Arc::new(StubService::default());

    let app = Router::new()
        .route(
            "/api/books",
            get(list_books).post(create_book).put(update_book),
        )
        .route("/api/books/:id", delete(delete_book))
        .with_state(service.clone());

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        runtime.block_on(async move {
            axum::serve(listener, app).await.unwrap();
        });
    });

    (format!("http://{addr}/api/books"), service)
}

fn connect(url: &str) -> BookStore {
    BookStore::new(ApiClient::with_url(url).unwrap())
}

fn book(id: i64, title: &str, author: &str, pages: u32) -> Book {
    Book {
        id,
        title: title.into(),
        author: author.into(),
        pages,
    }
}

fn draft(title: &str, author: &str, pages: u32) -> BookDraft {
    BookDraft {
        title: title.into(),
        author: author.into(),
        pages,
    }
}

/// Pull the typed API error out of an anyhow chain.
fn api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .next()
}

// ============================================================================
// load
// ============================================================================

#[test]
fn load_mirrors_the_seeded_collection() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    let count = store.load().unwrap();

    assert_eq!(count, 1);
    assert_eq!(store.books(), &[book(1, "Dune", "Herbert", 412)]);
}

#[test]
fn load_failure_keeps_the_previous_sequence() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    service.set_failing(true);
    assert!(store.load().is_err());
    assert_eq!(store.books(), before.as_slice());
}

#[test]
fn initial_load_failure_leaves_an_empty_sequence() {
    let (url, service) = spawn_stub();
    service.set_failing(true);

    let mut store = connect(&url);
    assert!(store.load().is_err());
    assert!(store.is_empty());
}

// ============================================================================
// create
// ============================================================================

#[test]
fn create_appends_exactly_one_entry_with_the_server_id() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    let created = store.create(draft("Foo", "Bar", 10)).unwrap();

    assert_eq!(created, book(2, "Foo", "Bar", 10));
    let mut expected = before;
    expected.push(created);
    assert_eq!(store.books(), expected.as_slice());
}

#[test]
fn failed_create_changes_nothing() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    service.set_failing(true);
    assert!(store.create(draft("Foo", "Bar", 10)).is_err());
    assert_eq!(store.books(), before.as_slice());
    service.set_failing(false);
    assert_eq!(service.snapshot(), before);
}

#[test]
fn load_after_create_round_trips_the_new_book() {
    let (url, _service) = spawn_stub();

    let mut store = connect(&url);
    store.load().unwrap();
    let created = store.create(draft("Foo", "Bar", 10)).unwrap();

    store.load().unwrap();
    assert!(store.books().contains(&created));
}

// ============================================================================
// update
// ============================================================================

#[test]
fn update_replaces_only_the_matching_entry() {
    let (url, service) = spawn_stub();
    service.seed(vec![
        book(1, "Dune", "Herbert", 412),
        book(2, "Foo", "Bar", 10),
    ]);

    let mut store = connect(&url);
    store.load().unwrap();

    store.update(book(1, "Dune Messiah", "Herbert", 256)).unwrap();

    assert_eq!(
        store.books(),
        &[
            book(1, "Dune Messiah", "Herbert", 256),
            book(2, "Foo", "Bar", 10),
        ]
    );
    assert_eq!(service.snapshot()[0], book(1, "Dune Messiah", "Herbert", 256));
}

#[test]
fn failed_update_changes_nothing() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    service.set_failing(true);
    assert!(store.update(book(1, "Dune Messiah", "Herbert", 256)).is_err());
    assert_eq!(store.books(), before.as_slice());
}

#[test]
fn update_of_an_unknown_id_is_surfaced_as_a_failure() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    let err = store.update(book(42, "Ghost", "Nobody", 1)).unwrap_err();
    assert!(matches!(api_error(&err), Some(ApiError::Status(404))));
    assert_eq!(store.books(), before.as_slice());
}

// ============================================================================
// remove
// ============================================================================

#[test]
fn remove_drops_only_the_matching_entry() {
    let (url, service) = spawn_stub();
    service.seed(vec![
        book(1, "Dune", "Herbert", 412),
        book(2, "Foo", "Bar", 10),
        book(3, "Baz", "Qux", 99),
    ]);

    let mut store = connect(&url);
    store.load().unwrap();

    store.remove(2).unwrap();

    assert_eq!(
        store.books(),
        &[book(1, "Dune", "Herbert", 412), book(3, "Baz", "Qux", 99)]
    );
}

#[test]
fn remove_receiving_http_500_keeps_the_row() {
    let (url, service) = spawn_stub();
    service.seed(vec![
        book(1, "Dune", "Herbert", 412),
        book(2, "Foo", "Bar", 10),
    ]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    service.set_failing(true);
    let err = store.remove(2).unwrap_err();

    assert!(matches!(api_error(&err), Some(ApiError::Status(500))));
    assert_eq!(store.books(), before.as_slice());
    assert!(store.books().iter().any(|b| b.id == 2));
}

#[test]
fn removing_an_absent_id_never_touches_other_entries() {
    let (url, service) = spawn_stub();
    service.seed(vec![book(1, "Dune", "Herbert", 412)]);

    let mut store = connect(&url);
    store.load().unwrap();
    let before = store.books().to_vec();

    // The stub answers 404 for an id it does not hold; the store surfaces
    // the failure and leaves the sequence alone. A second attempt behaves
    // the same.
    for _ in 0..2 {
        let err = store.remove(99).unwrap_err();
        assert!(matches!(api_error(&err), Some(ApiError::Status(404))));
        assert_eq!(store.books(), before.as_slice());
    }
}

// ============================================================================
// error taxonomy
// ============================================================================

#[test]
fn unreachable_server_surfaces_a_transport_error() {
    // Bind and immediately drop a listener so we have a local port with
    // nothing behind it.
    let port = {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut store = connect(&format!("http://127.0.0.1:{port}/api/books"));
    let err = store.load().unwrap_err();

    assert!(matches!(api_error(&err), Some(ApiError::Transport(_))));
    assert!(store.is_empty());
}
