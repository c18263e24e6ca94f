//! Search request model.

use serde::{Deserialize, Serialize};

/// Title search parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text paper title
    pub title: String,

    /// Maximum number of hits to request (`None` = provider default)
    pub max_hits: Option<usize>,
}

impl SearchQuery {
    /// Create a new query for a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            max_hits: None,
        }
    }

    /// Set the maximum number of hits
    pub fn max_hits(mut self, max_hits: Option<usize>) -> Self {
        self.max_hits = max_hits;
        self
    }
}
