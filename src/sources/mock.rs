//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::SearchRequest;
use crate::sources::{Source, SourceError};

/// Canned reply handed out by [`MockSource`]
#[derive(Debug, Clone)]
enum MockReply {
    Feed(String),
    Api(String),
    Network(String),
}

/// A mock source for testing that returns predefined responses.
///
/// Without a configured reply it answers with an empty Atom feed.
/// Every request it receives is recorded.
#[derive(Debug, Default)]
pub struct MockSource {
    reply: Mutex<Option<MockReply>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source that answers every search with `feed`.
    pub fn with_feed(feed: impl Into<String>) -> Self {
        let source = Self::new();
        source.set_feed(feed);
        source
    }

    /// Set the feed body to return.
    pub fn set_feed(&self, feed: impl Into<String>) {
        self.set_reply(MockReply::Feed(feed.into()));
    }

    /// Make the next searches fail with an API (status) error.
    pub fn set_api_error(&self, message: impl Into<String>) {
        self.set_reply(MockReply::Api(message.into()));
    }

    /// Make the next searches fail with a network error.
    pub fn set_network_error(&self, message: impl Into<String>) {
        self.set_reply(MockReply::Network(message.into()));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_reply(&self, reply: MockReply) {
        let mut guard = self.reply.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(reply);
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn fetch_feed(&self, request: &SearchRequest) -> Result<String, SourceError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let guard = self.reply.lock().unwrap_or_else(|e| e.into_inner());
        match &*guard {
            Some(MockReply::Feed(feed)) => Ok(feed.clone()),
            Some(MockReply::Api(msg)) => Err(SourceError::Api(msg.clone())),
            Some(MockReply::Network(msg)) => Err(SourceError::Network(msg.clone())),
            None => Ok(empty_feed()),
        }
    }
}

/// A well-formed Atom feed without entries
pub fn empty_feed() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:nothing</title>
  <id>http://arxiv.org/api/empty</id>
  <updated>2024-01-01T00:00:00-05:00</updated>
</feed>"#
        .to_string()
}
