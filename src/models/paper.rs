//! Paper record extracted from a single Atom feed entry.

use serde::{Deserialize, Serialize};

/// Placeholder used when an entry carries no `title="pdf"` link.
pub const NO_PDF_FOUND: &str = "No PDF found";

/// Title given to entries that could not be extracted.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Number of characters of the published timestamp shown (the calendar date).
pub const DATE_DISPLAY_CHARS: usize = 10;

/// Number of summary characters shown before the truncation marker.
pub const SUMMARY_DISPLAY_CHARS: usize = 500;

/// Marker appended to every displayed summary.
pub const TRUNCATION_MARKER: &str = "...";

/// A paper found in an arXiv search.
///
/// Records are transient: one is built per feed entry, rendered, then dropped.
/// Every field always holds a value so rendering can never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Single-line title
    pub title: String,

    /// Author names in feed order
    pub authors: Vec<String>,

    /// Published timestamp as provided by the feed (ISO-8601)
    pub published: String,

    /// Abstract text, newlines flattened
    pub summary: String,

    /// PDF URL, or [`NO_PDF_FOUND`]
    pub pdf_link: String,
}

impl PaperRecord {
    /// Create a record with the given title and empty remaining fields
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            published: String::new(),
            summary: String::new(),
            pdf_link: NO_PDF_FOUND.to_string(),
        }
    }

    /// The record an entry degrades to when a required element is missing.
    pub fn unknown() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            authors: Vec::new(),
            published: String::new(),
            summary: String::new(),
            pdf_link: String::new(),
        }
    }

    /// Whether this is the placeholder record produced for an unreadable entry
    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    /// Set authors
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set published timestamp
    pub fn published(mut self, published: impl Into<String>) -> Self {
        self.published = published.into();
        self
    }

    /// Set summary
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set PDF link
    pub fn pdf_link(mut self, link: impl Into<String>) -> Self {
        self.pdf_link = link.into();
        self
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// Calendar date portion of the published timestamp
    pub fn date(&self) -> String {
        self.published.chars().take(DATE_DISPLAY_CHARS).collect()
    }

    /// Summary cut to [`SUMMARY_DISPLAY_CHARS`] characters with the marker appended.
    ///
    /// The marker is added even when the summary is shorter than the limit.
    pub fn summary_preview(&self) -> String {
        let mut preview: String = self.summary.chars().take(SUMMARY_DISPLAY_CHARS).collect();
        preview.push_str(TRUNCATION_MARKER);
        preview
    }
}
