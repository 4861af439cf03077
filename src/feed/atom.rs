//! Streaming Atom parser for arXiv query responses.
//!
//! Entries are the Atom `entry` elements directly under the document root.
//! Inside an entry only direct Atom children are read: `title`, `summary`,
//! `published`, `author/name` and `link`. An element's text is the character
//! data that precedes its first child element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use super::FeedError;
use crate::models::{PaperRecord, NO_PDF_FOUND};

/// Atom namespace URI
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Depth of entry elements (the root is depth 1)
const ENTRY_DEPTH: usize = 2;

/// Text of the first occurrence of a child element
#[derive(Debug, Default)]
struct ChildText {
    seen: bool,
    text: Option<String>,
}

impl ChildText {
    /// Claim the slot; later occurrences of the same element are ignored
    fn open(&mut self) -> bool {
        if self.seen {
            return false;
        }
        self.seen = true;
        true
    }

    fn push(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Published,
    AuthorName,
}

/// Element whose text is being collected
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    /// Set once a child element opens; later text is not the element's text
    frozen: bool,
}

/// Entry fields collected while streaming
#[derive(Debug, Default)]
struct EntryDraft {
    title: ChildText,
    summary: ChildText,
    published: ChildText,
    authors: Vec<ChildText>,
    in_author: bool,
    /// `Some(href)` once a `title="pdf"` link was seen; the href may be missing
    pdf_link: Option<Option<String>>,
}

impl EntryDraft {
    fn slot(&mut self, field: Field) -> Option<&mut ChildText> {
        match field {
            Field::Title => Some(&mut self.title),
            Field::Summary => Some(&mut self.summary),
            Field::Published => Some(&mut self.published),
            Field::AuthorName => self.authors.last_mut(),
        }
    }

    fn finish(self) -> PaperRecord {
        self.build().unwrap_or_else(|| {
            tracing::debug!("Feed entry is missing required fields");
            PaperRecord::unknown()
        })
    }

    fn build(self) -> Option<PaperRecord> {
        let title = self.title.text?;
        let summary = self.summary.text?;
        let published = self.published.text?;
        let authors = self
            .authors
            .into_iter()
            .map(|author| author.text.map(|name| normalize_line_ends(&name)))
            .collect::<Option<Vec<_>>>()?;
        let pdf_link = match self.pdf_link {
            Some(href) => href?,
            None => NO_PDF_FOUND.to_string(),
        };

        Some(PaperRecord {
            title: single_line(&title),
            authors,
            published: normalize_line_ends(&published).trim().to_string(),
            summary: single_line(&summary),
            pdf_link,
        })
    }
}

/// Line-end handling of XML 1.0 section 2.11: `\r\n` and a lone `\r` become `\n`.
/// quick-xml passes carriage returns through untouched.
fn normalize_line_ends(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Trim and put a multi-line feed value on one line
fn single_line(text: &str) -> String {
    normalize_line_ends(text).trim().replace('\n', " ")
}

fn is_atom(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == ATOM_NAMESPACE.as_bytes())
}

/// `title` and `href` attributes of a link element
fn link_attributes(e: &BytesStart<'_>) -> Result<(Option<String>, Option<String>), Issue> {
    let mut title = None;
    let mut href = None;

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        match attr.key.as_ref() {
            b"title" => title = Some(attr.unescape_value()?.into_owned()),
            b"href" => href = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    Ok((title, href))
}

/// Problem found while handling one event
#[derive(Debug)]
enum Issue {
    Xml(quick_xml::Error),
    Malformed(&'static str),
}

impl From<quick_xml::Error> for Issue {
    fn from(err: quick_xml::Error) -> Self {
        Issue::Xml(err)
    }
}

impl Issue {
    fn at(self, position: u64) -> FeedError {
        match self {
            Issue::Xml(source) => FeedError::Xml { position, source },
            Issue::Malformed(message) => FeedError::Malformed {
                position,
                message: message.to_string(),
            },
        }
    }
}

/// Streaming state for one document
#[derive(Debug, Default)]
struct FeedParser {
    depth: usize,
    root_seen: bool,
    root_closed: bool,
    entry: Option<EntryDraft>,
    capture: Option<Capture>,
    papers: Vec<PaperRecord>,
}

impl FeedParser {
    /// Handle an opening tag. `self_closing` is true for `<tag/>`.
    fn open(
        &mut self,
        atom: bool,
        e: &BytesStart<'_>,
        self_closing: bool,
    ) -> Result<(), Issue> {
        let parent_depth = self.depth;

        if parent_depth == 0 {
            if self.root_seen {
                return Err(Issue::Malformed("junk after document element"));
            }
            self.root_seen = true;
        }

        if let Some(capture) = self.capture.as_mut() {
            capture.frozen = true;
        }

        let local = e.local_name();
        let local = local.as_ref();

        match parent_depth {
            1 if atom && local == b"entry" => {
                self.entry = Some(EntryDraft::default());
            }
            2 => {
                if let Some(entry) = self.entry.as_mut() {
                    let field = match local {
                        b"title" if atom => Some(Field::Title),
                        b"summary" if atom => Some(Field::Summary),
                        b"published" if atom => Some(Field::Published),
                        b"author" if atom => {
                            entry.authors.push(ChildText::default());
                            entry.in_author = !self_closing;
                            None
                        }
                        b"link" if atom && entry.pdf_link.is_none() => {
                            let (title, href) = link_attributes(e)?;
                            if title.as_deref() == Some("pdf") {
                                entry.pdf_link = Some(href);
                            }
                            None
                        }
                        _ => None,
                    };
                    if let Some(field) = field {
                        self.begin_capture(field, self_closing);
                    }
                }
            }
            3 if atom && local == b"name" => {
                if self.entry.as_ref().is_some_and(|entry| entry.in_author) {
                    self.begin_capture(Field::AuthorName, self_closing);
                }
            }
            _ => {}
        }

        if self_closing {
            self.close_element(parent_depth + 1);
        } else {
            self.depth += 1;
        }

        Ok(())
    }

    fn begin_capture(&mut self, field: Field, self_closing: bool) {
        let Some(slot) = self.entry.as_mut().and_then(|entry| entry.slot(field)) else {
            return;
        };
        if slot.open() && !self_closing {
            self.capture = Some(Capture {
                field,
                depth: self.depth + 1,
                frozen: false,
            });
        }
    }

    /// Handle a closing tag
    fn close(&mut self) -> Result<(), Issue> {
        if self.depth == 0 {
            return Err(Issue::Malformed("closing tag without matching opening tag"));
        }
        let closed_depth = self.depth;
        self.depth -= 1;
        self.close_element(closed_depth);
        Ok(())
    }

    /// Bookkeeping after the element at `depth` ends
    fn close_element(&mut self, depth: usize) {
        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            self.capture = None;
        }

        match depth {
            1 => self.root_closed = true,
            ENTRY_DEPTH => {
                if let Some(entry) = self.entry.take() {
                    self.papers.push(entry.finish());
                }
            }
            3 => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.in_author = false;
                }
            }
            _ => {}
        }
    }

    /// Handle character data. Empty chunks (e.g. `<![CDATA[]]>`) carry no text.
    fn text(&mut self, text: &str) -> Result<(), Issue> {
        if text.is_empty() {
            return Ok(());
        }
        if self.depth == 0 {
            if !text.trim().is_empty() {
                return Err(Issue::Malformed("text outside of the root element"));
            }
            return Ok(());
        }

        let Some(capture) = self.capture.as_ref() else {
            return Ok(());
        };
        if capture.frozen || capture.depth != self.depth {
            return Ok(());
        }

        let field = capture.field;
        if let Some(slot) = self.entry.as_mut().and_then(|entry| entry.slot(field)) {
            slot.push(text);
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<PaperRecord>, Issue> {
        if !self.root_seen {
            return Err(Issue::Malformed("no element found"));
        }
        if self.depth != 0 || !self.root_closed {
            return Err(Issue::Malformed("unclosed element at end of document"));
        }
        Ok(self.papers)
    }
}

/// Parse an Atom feed into paper records, in document order.
///
/// Fails only when the document itself is not well-formed XML. Entries with
/// missing fields become [`PaperRecord::unknown`].
pub fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>, FeedError> {
    let mut reader = NsReader::from_str(xml);
    let mut parser = FeedParser::default();

    loop {
        let position = reader.buffer_position() as u64;
        let result = reader
            .read_resolved_event()
            .map(|(ns, event)| (is_atom(&ns), event));
        let (atom, event) = match result {
            Ok(pair) => pair,
            Err(source) => {
                return Err(FeedError::Xml {
                    position: reader.error_position() as u64,
                    source,
                })
            }
        };

        let step = match event {
            Event::Start(e) => parser.open(atom, &e, false),
            Event::Empty(e) => parser.open(atom, &e, true),
            Event::End(_) => parser.close(),
            Event::Text(e) => match e.unescape() {
                Ok(text) => parser.text(&text),
                Err(err) => Err(Issue::Xml(err)),
            },
            Event::CData(e) => parser.text(&String::from_utf8_lossy(&e.into_inner())),
            Event::Eof => break,
            _ => Ok(()),
        };
        step.map_err(|issue| issue.at(position))?;
    }

    let position = reader.buffer_position() as u64;
    parser.finish().map_err(|issue| issue.at(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::outcome_from_feed;
    use crate::models::SearchOutcome;

    fn feed(entries: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: search_query=all:LLM</title>
  <id>http://arxiv.org/api/abc</id>
  <updated>2024-05-02T00:00:00-04:00</updated>
{}
</feed>"#,
            entries
        )
    }

    const FULL_ENTRY: &str = r#"
  <entry>
    <id>http://arxiv.org/abs/2405.00001v1</id>
    <updated>2024-05-01T17:59:58Z</updated>
    <published>2024-05-01T17:59:58Z</published>
    <title>Scaling Laws for
  Language Models</title>
    <summary>  We study scaling.
Results follow a power law.
</summary>
    <author>
      <name>Jane Doe</name>
    </author>
    <author>
      <name>John Smith</name>
      <arxiv:affiliation>Somewhere</arxiv:affiliation>
    </author>
    <link href="http://arxiv.org/abs/2405.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2405.00001v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
  </entry>"#;

    #[test]
    fn test_parse_full_entry() {
        let papers = parse_feed(&feed(FULL_ENTRY)).unwrap();
        assert_eq!(papers.len(), 1);

        let paper = &papers[0];
        assert_eq!(paper.title, "Scaling Laws for   Language Models");
        assert_eq!(paper.summary, "We study scaling. Results follow a power law.");
        assert_eq!(paper.published, "2024-05-01T17:59:58Z");
        assert_eq!(paper.authors, vec!["Jane Doe", "John Smith"]);
        assert_eq!(paper.pdf_link, "http://arxiv.org/pdf/2405.00001v1");
        assert_eq!(paper.date(), "2024-05-01");
    }

    #[test]
    fn test_entries_keep_document_order() {
        let entries: String = (1..=3)
            .map(|i| {
                format!(
                    "<entry><title>Paper {i}</title><summary>s</summary>\
                     <published>2024-01-0{i}T00:00:00Z</published></entry>"
                )
            })
            .collect();

        let papers = parse_feed(&feed(&entries)).unwrap();
        let titles: Vec<_> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Paper 1", "Paper 2", "Paper 3"]);
        assert!(papers.iter().all(|p| p.authors.is_empty()));
    }

    #[test]
    fn test_missing_pdf_link_uses_placeholder() {
        let entry = r#"<entry>
            <title>T</title><summary>S</summary><published>2024-01-01T00:00:00Z</published>
            <link href="http://arxiv.org/abs/1" rel="alternate"/>
            <link title="doi" href="http://dx.doi.org/10.1/x" rel="related"/>
        </entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert_eq!(papers[0].pdf_link, "No PDF found");
        assert!(!papers[0].is_unknown());
    }

    #[test]
    fn test_first_pdf_link_wins() {
        let entry = r#"<entry>
            <title>T</title><summary>S</summary><published>2024-01-01T00:00:00Z</published>
            <link title="pdf" href="http://first.example/pdf"></link>
            <link title="pdf" href="http://second.example/pdf"/>
        </entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert_eq!(papers[0].pdf_link, "http://first.example/pdf");
    }

    #[test]
    fn test_missing_title_degrades_entry() {
        let entries = r#"
        <entry><summary>S</summary><published>2024-01-01T00:00:00Z</published></entry>
        <entry><title>Kept</title><summary>S</summary><published>2024-01-02T00:00:00Z</published></entry>"#;

        let papers = parse_feed(&feed(entries)).unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0], PaperRecord::unknown());
        assert_eq!(papers[1].title, "Kept");
    }

    #[test]
    fn test_missing_summary_or_published_degrades_entry() {
        let entries = r#"
        <entry><title>T</title><published>2024-01-01T00:00:00Z</published></entry>
        <entry><title>T</title><summary>S</summary></entry>"#;

        let papers = parse_feed(&feed(entries)).unwrap();
        assert!(papers.iter().all(PaperRecord::is_unknown));
    }

    #[test]
    fn test_textless_element_degrades_entry() {
        let entries = r#"
        <entry><title/><summary>S</summary><published>2024-01-01T00:00:00Z</published></entry>
        <entry><title></title><summary>S</summary><published>2024-01-01T00:00:00Z</published></entry>"#;

        let papers = parse_feed(&feed(entries)).unwrap();
        assert_eq!(papers.len(), 2);
        assert!(papers.iter().all(PaperRecord::is_unknown));
    }

    #[test]
    fn test_whitespace_only_title_is_kept_empty() {
        let entry = r#"<entry><title>   </title><summary>S</summary><published>2024-01-01T00:00:00Z</published></entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert_eq!(papers[0].title, "");
        assert!(!papers[0].is_unknown());
    }

    #[test]
    fn test_author_without_name_degrades_entry() {
        let entries = r#"
        <entry><title>T</title><summary>S</summary><published>2024-01-01T00:00:00Z</published>
          <author><email>x@example.org</email></author></entry>
        <entry><title>T</title><summary>S</summary><published>2024-01-01T00:00:00Z</published>
          <author/></entry>"#;

        let papers = parse_feed(&feed(entries)).unwrap();
        assert!(papers.iter().all(PaperRecord::is_unknown));
    }

    #[test]
    fn test_pdf_link_without_href_degrades_entry() {
        let entry = r#"<entry><title>T</title><summary>S</summary>
            <published>2024-01-01T00:00:00Z</published><link title="pdf"/></entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert!(papers[0].is_unknown());
    }

    #[test]
    fn test_only_atom_children_count() {
        // Title outside the Atom namespace is not the entry's title
        let entry = r#"<entry xmlns:x="urn:other">
            <x:title>Wrong</x:title><summary>S</summary><published>2024-01-01T00:00:00Z</published>
        </entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert!(papers[0].is_unknown());
    }

    #[test]
    fn test_non_atom_and_nested_entries_ignored() {
        let body = r#"
        <entry xmlns="urn:not-atom"><title>Nope</title></entry>
        <group><entry><title>Nested</title><summary>S</summary><published>p</published></entry></group>"#;

        assert!(parse_feed(&feed(body)).unwrap().is_empty());
    }

    #[test]
    fn test_title_text_stops_at_first_child() {
        let entry = r#"<entry><title>Lead<b>bold</b> tail</title><summary>S</summary>
            <published>2024-01-01T00:00:00Z</published></entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert_eq!(papers[0].title, "Lead");
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let entry = r#"<entry><title>Q &amp; A &lt;3</title><summary><![CDATA[x < y & z]]></summary>
            <published>2024-01-01T00:00:00Z</published><author><name>O&apos;Brien</name></author></entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert_eq!(papers[0].title, "Q & A <3");
        assert_eq!(papers[0].summary, "x < y & z");
        assert_eq!(papers[0].authors, vec!["O'Brien"]);
    }

    #[test]
    fn test_crlf_line_ends_are_normalized() {
        let entry = "<entry>\r\n<title>Scaling\r\nLaws</title>\r\n\
            <summary>Line one\r\nLine two\rLine three</summary>\r\n\
            <published>2024-01-01T00:00:00Z\r\n</published>\r\n\
            <author><name>Jane\r\nDoe</name></author>\r\n</entry>";
        let xml = feed(entry).replace('\n', "\r\n").replace("\r\r\n", "\r\n");

        let papers = parse_feed(&xml).unwrap();
        assert_eq!(papers[0].title, "Scaling Laws");
        assert_eq!(papers[0].summary, "Line one Line two Line three");
        assert_eq!(papers[0].published, "2024-01-01T00:00:00Z");
        assert_eq!(papers[0].authors, vec!["Jane\nDoe"]);
        assert!(!papers[0].title.contains('\r'));
    }

    #[test]
    fn test_empty_cdata_title_degrades_entry() {
        let entry = r#"<entry><title><![CDATA[]]></title><summary>S</summary>
            <published>2024-01-01T00:00:00Z</published></entry>"#;

        let papers = parse_feed(&feed(entry)).unwrap();
        assert!(papers[0].is_unknown());

        let entry = r#"<entry><title><![CDATA[]]>Kept</title><summary>S</summary>
            <published>2024-01-01T00:00:00Z</published></entry>"#;
        assert_eq!(parse_feed(&feed(entry)).unwrap()[0].title, "Kept");
    }

    #[test]
    fn test_empty_feed_has_no_entries() {
        assert!(parse_feed(&feed("")).unwrap().is_empty());
        assert!(parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_documents_fail() {
        let cases = [
            "",
            "   ",
            "not xml at all",
            "<feed xmlns=\"http://www.w3.org/2005/Atom\"><entry></feed>",
            "<feed xmlns=\"http://www.w3.org/2005/Atom\"><entry>",
            "<feed/><feed/>",
            "<feed>&undefined;</feed>",
            "</feed>",
        ];

        for case in cases {
            assert!(parse_feed(case).is_err(), "expected failure for {:?}", case);
        }
    }

    #[test]
    fn test_error_message_names_problem() {
        let err = parse_feed("").unwrap_err();
        assert!(err.to_string().contains("no element found"), "{}", err);

        let err = parse_feed("<feed><entry>").unwrap_err();
        assert!(err.to_string().contains("unclosed element"), "{}", err);
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(outcome_from_feed("q", &feed("")), SearchOutcome::Empty);

        match outcome_from_feed("LLM", &feed(FULL_ENTRY)) {
            SearchOutcome::Found { query, papers } => {
                assert_eq!(query, "LLM");
                assert_eq!(papers.len(), 1);
            }
            other => panic!("expected papers, got {:?}", other),
        }

        assert!(matches!(
            outcome_from_feed("q", "<feed>"),
            SearchOutcome::ParseError(_)
        ));
    }
}
