//! Atom feed parsing and rendering.
//!
//! [`parse_feed`] turns the raw arXiv response into paper records,
//! [`outcome_from_feed`] classifies the result, and the [`std::fmt::Display`]
//! impl on [`SearchOutcome`] renders it as the text returned to callers.

mod atom;
mod render;

pub use atom::{parse_feed, ATOM_NAMESPACE};
pub use render::{
    render_outcome, render_papers, API_ERROR_PREFIX, NO_PAPERS_FOUND, PARSE_ERROR_PREFIX,
};

use crate::models::SearchOutcome;

/// Errors that make a feed unusable as a whole
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The XML reader rejected the document
    #[error("{source} (at byte {position})")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The document is not a single well-formed element tree
    #[error("{message} (at byte {position})")]
    Malformed { position: u64, message: String },
}

/// Parse a raw feed and classify the result for `query`
pub fn outcome_from_feed(query: &str, xml: &str) -> SearchOutcome {
    match parse_feed(xml) {
        Ok(papers) if papers.is_empty() => SearchOutcome::Empty,
        Ok(papers) => {
            let unknown = papers.iter().filter(|p| p.is_unknown()).count();
            if unknown > 0 {
                tracing::debug!(unknown, total = papers.len(), "Some feed entries were incomplete");
            }
            SearchOutcome::Found {
                query: query.to_string(),
                papers,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse arXiv feed");
            SearchOutcome::ParseError(e.to_string())
        }
    }
}
