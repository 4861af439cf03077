//! Plain-text rendering of search outcomes.

use std::fmt;

use crate::models::{PaperRecord, SearchOutcome};

/// Text returned when the feed holds no entries
pub const NO_PAPERS_FOUND: &str = "No papers found.";

/// Prefix of texts reporting a failed API call
pub const API_ERROR_PREFIX: &str = "ArXiv API Error";

/// Prefix of texts reporting an unparsable feed
pub const PARSE_ERROR_PREFIX: &str = "XML Parse Error";

/// Render one paper block (1-based `index`), newline-terminated
fn render_paper(index: usize, paper: &PaperRecord) -> String {
    format!(
        "--- Paper {} ---\nTitle: {}\nAuthors: {}\nDate: {}\nPDF: {}\nAbstract: {}\n",
        index,
        paper.title,
        paper.author_line(),
        paper.date(),
        paper.pdf_link,
        paper.summary_preview()
    )
}

/// Render a header line followed by one block per paper, blank-line separated
pub fn render_papers(query: &str, papers: &[PaperRecord]) -> String {
    let mut out = format!("Found {} papers for '{}':\n", papers.len(), query);
    for (i, paper) in papers.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_paper(i + 1, paper));
    }
    out
}

/// Render any outcome as the text handed back to callers
pub fn render_outcome(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Found { query, papers } => render_papers(query, papers),
        SearchOutcome::Empty => NO_PAPERS_FOUND.to_string(),
        SearchOutcome::ApiError(detail) => format!("{}: {}", API_ERROR_PREFIX, detail),
        SearchOutcome::ParseError(detail) => format!("{}: {}", PARSE_ERROR_PREFIX, detail),
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_outcome(self))
    }
}
