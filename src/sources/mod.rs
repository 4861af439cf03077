//! Feed sources.
//!
//! A [`Source`] performs the outbound half of a search: it turns a
//! [`SearchRequest`] into a single HTTP call and hands back the raw feed text.
//! Parsing and rendering live in [`crate::feed`].
//!
//! [`ArxivSource`] talks to the public arXiv API. [`MockSource`] returns canned
//! bodies or errors and is used to exercise the pipeline without a network.

mod arxiv;
pub mod mock;

pub use arxiv::{ArxivSource, ARXIV_API_URL};
pub use mock::MockSource;

use crate::models::SearchRequest;
use async_trait::async_trait;
use std::time::Duration;

/// Interface for anything that can answer a keyword search with an Atom feed.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch the raw feed for a search. One attempt, no retries.
    async fn fetch_feed(&self, request: &SearchRequest) -> Result<String, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error from the source (non-success status)
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}
