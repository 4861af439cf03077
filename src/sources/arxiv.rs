//! arXiv research source implementation.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::sync::Arc;

use crate::config::ArxivConfig;
use crate::models::{SearchRequest, ARXIV_MAX_RESULTS};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// arXiv research source
///
/// Issues one `GET` per search, sorted by submission date (newest first),
/// and returns the Atom feed body untouched.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    api_url: String,
}

impl ArxivSource {
    /// Create a new arXiv source with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ArxivConfig::default())
    }

    /// Create a source from configuration
    pub fn from_config(config: &ArxivConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: Arc::new(HttpClient::new(config.timeout())?),
            api_url: config.api_url.clone(),
        })
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(client: Arc<HttpClient>, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Endpoint queried by this source
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Query string parameters for a search
    pub(crate) fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
        vec![
            ("search_query", format!("all:{}", request.query)),
            ("start", "0".to_string()),
            ("max_results", request.max_results.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ]
    }

    /// Map a transport failure to a source error, keeping timeouts distinct
    fn transport_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(self.client.timeout())
        } else {
            SourceError::Network(format!("Failed to fetch arXiv results: {}", err))
        }
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn fetch_feed(&self, request: &SearchRequest) -> Result<String, SourceError> {
        if request.max_results == 0 {
            return Err(SourceError::InvalidRequest(
                "max_results must be a positive integer".to_string(),
            ));
        }

        let mut request = request.clone();
        if request.max_results > ARXIV_MAX_RESULTS {
            tracing::debug!(
                requested = request.max_results,
                limit = ARXIV_MAX_RESULTS,
                "Clamping max_results to arXiv page limit"
            );
            request.max_results = ARXIV_MAX_RESULTS;
        }

        let params = Self::query_params(&request);
        tracing::debug!(url = %self.api_url, ?params, "Querying arXiv");

        let response = self
            .client
            .get(&self.api_url)
            .header(ACCEPT, "application/atom+xml")
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| self.transport_error(e))
    }
}
