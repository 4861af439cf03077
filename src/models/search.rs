//! Search request and outcome models.

use serde::{Deserialize, Serialize};

use super::PaperRecord;

/// Default number of results when the caller does not ask for a count
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Largest page the arXiv API serves in a single call
pub const ARXIV_MAX_RESULTS: usize = 2000;

/// Parameters for one keyword search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Keyword(s), searched across all fields
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

/// Result of a search before it is rendered as text.
///
/// Every failure the pipeline can hit is one of these variants; only
/// rendering turns them into the plain text handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The feed contained at least one entry
    Found {
        query: String,
        papers: Vec<PaperRecord>,
    },

    /// The feed parsed but held no entries
    Empty,

    /// The request to arXiv failed (network, timeout, HTTP status)
    ApiError(String),

    /// The response was not a well-formed XML document
    ParseError(String),
}

impl SearchOutcome {
    /// Number of papers carried by the outcome
    pub fn paper_count(&self) -> usize {
        match self {
            SearchOutcome::Found { papers, .. } => papers.len(),
            _ => 0,
        }
    }

    /// Whether the outcome represents a failed request or response
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SearchOutcome::ApiError(_) | SearchOutcome::ParseError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_builder() {
        let request = SearchRequest::new("LLM").max_results(3);
        assert_eq!(request.query, "LLM");
        assert_eq!(request.max_results, 3);
        assert_eq!(SearchRequest::new("x").max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_outcome_helpers() {
        let found = SearchOutcome::Found {
            query: "q".to_string(),
            papers: vec![PaperRecord::unknown(), PaperRecord::unknown()],
        };
        assert_eq!(found.paper_count(), 2);
        assert!(!found.is_error());
        assert_eq!(SearchOutcome::Empty.paper_count(), 0);
        assert!(SearchOutcome::ApiError("boom".into()).is_error());
        assert!(SearchOutcome::ParseError("bad".into()).is_error());
    }
}
