use std::time::Duration;

use thiserror::Error;

use crate::config::Config;

/// How long a single remote call may take before we give up. The UI event
/// loop blocks while a request is in flight, so this caps how long a dead
/// server can freeze the screen.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything that can go wrong talking to the books service. The two
/// variants are the whole failure taxonomy: either the request never
/// completed, or it completed with a non-success status. Callers treat both
/// the same way (the operation failed, local state stays put), but the
/// messages differ so the footer can say what actually happened.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the books service")]
    Transport(#[from] reqwest::Error),
    #[error("books service returned HTTP {0}")]
    Status(u16),
}

/// Shared handle for all remote calls: one pooled HTTP client plus the
/// configured collection URL. The functions in [`super::books`] take this by
/// reference the same way the rest of the app passes it around.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    collection_url: String,
}

impl ApiClient {
    /// Build a client for the configured endpoint.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_url(config.api_url.clone())
    }

    /// Build a client for an explicit collection URL. Handy for tests that
    /// bind a stub server to an ephemeral port.
    pub fn with_url(collection_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let mut collection_url = collection_url.into();
        while collection_url.ends_with('/') {
            collection_url.pop();
        }
        Ok(Self {
            http,
            collection_url,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::blocking::Client {
        &self.http
    }

    /// URL of the whole collection (list, create, update).
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// URL of a single record (delete).
    pub fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.collection_url)
    }
}
