//! Metadata providers behind one trait.
//!
//! This module defines the [`Source`] trait every metadata provider implements.
//! A provider takes a paper title and returns candidate [`SearchHit`]s; the
//! provider's own response shape (DBLP JSON, Google Scholar HTML) never leaves
//! its module.
//!
//! # Providers
//!
//! - `dblp` - DBLP publication search API (default)
//! - `google_scholar` - Google Scholar result page scraping
//! - `mock` - canned responses for tests
//!
//! The provider is chosen with [`SourceKind`], either from the configuration
//! file (`provider.kind`), the `PDF2BIBTEX_PROVIDER__KIND` environment
//! variable, or the `--source` command-line flag.

mod dblp;
mod google_scholar;
pub mod mock;

pub use dblp::DblpSource;
pub use google_scholar::GoogleScholarSource;
pub use mock::MockSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::models::{SearchHit, SearchQuery};
use crate::report::Reporter;
use crate::utils::{HttpClient, RetryConfig};

/// The Source trait defines the interface for all metadata providers.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Convert the provider's response into [`SearchHit`]s inside `search`
/// 3. Skip records that lack a title or a year, reporting one warning each
/// 4. Add a [`SourceKind`] variant and wire it into [`create_source`]
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "dblp")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for publications matching a title
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SourceError>;
}

/// Available metadata providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Dblp,
    GoogleScholar,
}

impl SourceKind {
    pub fn id(&self) -> &'static str {
        match self {
            SourceKind::Dblp => "dblp",
            SourceKind::GoogleScholar => "google_scholar",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Build the provider selected by the configuration
pub fn create_source(
    config: &ProviderConfig,
    client: HttpClient,
    reporter: Arc<dyn Reporter>,
) -> Box<dyn Source> {
    let retry = RetryConfig::with_retries(config.retries);
    match config.kind {
        SourceKind::Dblp => Box::new(
            DblpSource::new(client, reporter)
                .with_base_url(config.dblp_url.clone())
                .with_retry(retry),
        ),
        SourceKind::GoogleScholar => Box::new(
            GoogleScholarSource::new(client, reporter)
                .with_base_url(config.scholar_url.clone())
                .with_retry(retry),
        ),
    }
}

/// Errors that can occur when querying a provider
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, TLS, proxy)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Non-success status embedded in the response body
    #[error("{provider} search did not complete successfully (status {code})")]
    Status { provider: String, code: String },

    /// The provider refused to serve results (captcha, unusual traffic page)
    #[error("Blocked by provider: {0}")]
    Blocked(String),

    /// Parsing error (JSON, HTML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SourceError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SourceError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SourceError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::InvalidRequest(format!("URL: {}", err))
    }
}
