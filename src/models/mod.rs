//! Core data models for arXiv searches.

mod paper;
mod search;

pub use paper::{
    PaperRecord, DATE_DISPLAY_CHARS, NO_PDF_FOUND, SUMMARY_DISPLAY_CHARS, TRUNCATION_MARKER,
    UNKNOWN_TITLE,
};
pub use search::{SearchOutcome, SearchRequest, ARXIV_MAX_RESULTS, DEFAULT_MAX_RESULTS};
