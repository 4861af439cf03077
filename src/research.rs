//! Search pipeline: fetch a feed from a source, then parse and classify it.

use std::sync::Arc;

use crate::config::ArxivConfig;
use crate::feed::outcome_from_feed;
use crate::models::{SearchOutcome, SearchRequest};
use crate::sources::{ArxivSource, Source, SourceError};

/// Runs keyword searches against a single [`Source`].
///
/// Holds no mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct PaperSearch {
    source: Arc<dyn Source>,
    default_max_results: usize,
}

impl PaperSearch {
    /// Create a pipeline over any source
    pub fn new(source: Arc<dyn Source>, default_max_results: usize) -> Self {
        Self {
            source,
            default_max_results,
        }
    }

    /// Create a pipeline querying arXiv with the given settings
    pub fn arxiv(config: &ArxivConfig) -> Result<Self, SourceError> {
        let source = ArxivSource::from_config(config)?;
        Ok(Self::new(Arc::new(source), config.default_max_results))
    }

    /// Source used for searches
    pub fn source(&self) -> &Arc<dyn Source> {
        &self.source
    }

    /// Result count applied when the caller does not pass one
    pub fn default_max_results(&self) -> usize {
        self.default_max_results
    }

    /// Request for `query` using the default result count
    pub fn request(&self, query: impl Into<String>) -> SearchRequest {
        SearchRequest::new(query).max_results(self.default_max_results)
    }

    /// Run a search. Failures are reported in the outcome, never as an error.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        tracing::info!(
            query = %request.query,
            max_results = request.max_results,
            source = self.source.id(),
            "Received search request"
        );

        let body = match self.source.fetch_feed(request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, source = self.source.id(), "ArXiv API Error");
                return SearchOutcome::ApiError(e.to_string());
            }
        };

        let outcome = outcome_from_feed(&request.query, &body);
        tracing::debug!(papers = outcome.paper_count(), "Search finished");
        outcome
    }

    /// Run a search and render the outcome as text
    pub async fn search_text(&self, request: &SearchRequest) -> String {
        self.search(request).await.to_string()
    }
}
