//! One function per remote operation, mirroring the wire contract of the
//! books service: GET/POST/PUT on the collection URL, DELETE on the item URL,
//! JSON bodies throughout. Any non-2xx status is a uniform failure; callers
//! never branch on individual status codes.

use reqwest::blocking::Response;

use crate::models::{Book, BookDraft};

use super::client::{ApiClient, ApiError};

/// Fetch the full collection in server order.
pub fn fetch_books(client: &ApiClient) -> Result<Vec<Book>, ApiError> {
    let response = client.http().get(client.collection_url()).send()?;
    let response = ensure_success(response)?;
    Ok(response.json()?)
}

/// Create a book from a draft, returning the record the server stored
/// (including its assigned id) so the caller can append it directly.
pub fn create_book(client: &ApiClient, draft: &BookDraft) -> Result<Book, ApiError> {
    let response = client
        .http()
        .post(client.collection_url())
        .json(draft)
        .send()?;
    let response = ensure_success(response)?;
    Ok(response.json()?)
}

/// Replace a record on the server. The response body is ignored: we already
/// hold the full record we sent, so a success status is all we need.
pub fn update_book(client: &ApiClient, book: &Book) -> Result<(), ApiError> {
    let response = client
        .http()
        .put(client.collection_url())
        .json(book)
        .send()?;
    ensure_success(response)?;
    Ok(())
}

/// Delete a record by id.
pub fn delete_book(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    let response = client.http().delete(client.item_url(id)).send()?;
    ensure_success(response)?;
    Ok(())
}

/// Collapse every non-success status into [`ApiError::Status`].
fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}
