//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::models::{HitBuilder, SearchHit, SearchQuery};
use crate::sources::{Source, SourceError};

/// What the mock answers with
#[derive(Debug, Clone)]
enum MockResponse {
    Hits(Vec<SearchHit>),
    Status(String),
}

/// A mock source for testing that returns predefined responses.
///
/// Clones share their state, so a test can keep a handle after boxing one.
#[derive(Debug, Default, Clone)]
pub struct MockSource {
    response: Arc<Mutex<Option<MockResponse>>>,
    queries: Arc<Mutex<Vec<SearchQuery>>>,
}

impl MockSource {
    /// Create a new mock source that finds nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source that returns these hits.
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        let source = Self::new();
        source.set_hits(hits);
        source
    }

    /// Set the hits to return.
    pub fn set_hits(&self, hits: Vec<SearchHit>) {
        if let Ok(mut guard) = self.response.lock() {
            *guard = Some(MockResponse::Hits(hits));
        }
    }

    /// Make every search fail with a non-success status code.
    pub fn set_failure_status(&self, code: impl Into<String>) {
        if let Ok(mut guard) = self.response.lock() {
            *guard = Some(MockResponse::Status(code.into()));
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
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

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SourceError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        let response = self
            .response
            .lock()
            .map_err(|e| SourceError::InvalidRequest(format!("mock poisoned: {}", e)))?
            .clone();

        match response {
            Some(MockResponse::Hits(hits)) => Ok(hits),
            Some(MockResponse::Status(code)) => Err(SourceError::Status {
                provider: "Mock Source".to_string(),
                code,
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Helper function to create a mock hit for testing.
pub fn make_hit(title: &str, year: &str, authors: &[&str], pub_type: &str, venue: &str) -> SearchHit {
    HitBuilder::new(title, year)
        .authors(authors.iter().copied())
        .pub_type(pub_type)
        .venue(venue)
        .build()
}
