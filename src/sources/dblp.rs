//! DBLP metadata source.
//!
//! Uses the DBLP publication search API in JSON mode.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use crate::models::{HitBuilder, SearchHit, SearchQuery};
use crate::report::Reporter;
use crate::sources::{Source, SourceError};
use crate::utils::{with_retry, HttpClient, RetryConfig};

const DBLP_SEARCH_URL: &str = "https://dblp.org/search/publ/api";

/// Status code DBLP reports for a completed search
const DBLP_OK: &str = "200";

/// DBLP metadata source
#[derive(Debug, Clone)]
pub struct DblpSource {
    client: HttpClient,
    reporter: Arc<dyn Reporter>,
    base_url: String,
    retry: RetryConfig,
}

impl DblpSource {
    pub fn new(client: HttpClient, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client,
            reporter,
            base_url: DBLP_SEARCH_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Point at a different search endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Full request URL for a query
    pub fn request_url(&self, query: &SearchQuery) -> Result<Url, SourceError> {
        let mut params = vec![
            ("q", query.title.clone()),
            ("format", "json".to_string()),
        ];
        if let Some(max_hits) = query.max_hits {
            params.push(("h", max_hits.to_string()));
        }
        Ok(Url::parse_with_params(&self.base_url, &params)?)
    }

    /// Decode a DBLP JSON response body into hits.
    ///
    /// A status other than "200" fails the whole search. Hits without a title
    /// or a year are skipped with a warning.
    pub fn parse_response(&self, body: &str) -> Result<Vec<SearchHit>, SourceError> {
        self.reporter.debug(&format!("raw DBLP result: {}", body));

        let response: DblpResponse = serde_json::from_str(body)?;
        let code = response.result.status.code.into_string();
        if code != DBLP_OK {
            self.reporter
                .error("DBLP search did not complete successfully");
            return Err(SourceError::Status {
                provider: "DBLP".to_string(),
                code,
            });
        }
        self.reporter.info("dblp search succeeded");

        let hits = response
            .result
            .hits
            .map(|hits| hits.hit.into_vec())
            .unwrap_or_default();

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(info) = hit.info else {
                self.reporter.warn("skipping DBLP result without info record");
                continue;
            };
            match info.into_hit() {
                Ok(search_hit) => results.push(search_hit),
                Err(missing) => self.reporter.warn(&format!(
                    "skipping malformed DBLP result {}: missing {}",
                    missing.key.as_deref().unwrap_or("<no key>"),
                    missing.field
                )),
            }
        }

        Ok(results)
    }
}

#[async_trait]
impl Source for DblpSource {
    fn id(&self) -> &str {
        "dblp"
    }

    fn name(&self) -> &str {
        "DBLP"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SourceError> {
        self.reporter.info("grabbing records from dblp");
        let url = self.request_url(query)?;

        let body = with_retry(self.retry, self.reporter.as_ref(), || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(url.as_str())
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search DBLP: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Api {
                        status: status.as_u16(),
                        message: format!("DBLP API returned status: {}", status),
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to read DBLP response: {}", e)))
            }
        })
        .await?;

        self.reporter
            .info(&format!("request submitted via {}", url));

        self.parse_response(&body)
    }
}

// ========== Response Schema ==========

#[derive(Debug, Deserialize)]
struct DblpResponse {
    result: DblpResult,
}

#[derive(Debug, Deserialize)]
struct DblpResult {
    status: DblpStatus,
    #[serde(default)]
    hits: Option<DblpHits>,
}

#[derive(Debug, Deserialize)]
struct DblpStatus {
    #[serde(rename = "@code")]
    code: Scalar,
}

#[derive(Debug, Deserialize)]
struct DblpHits {
    #[serde(default)]
    hit: OneOrMany<DblpHit>,
}

#[derive(Debug, Deserialize)]
struct DblpHit {
    #[serde(default)]
    info: Option<DblpInfo>,
}

#[derive(Debug, Deserialize)]
struct DblpInfo {
    title: Option<String>,
    year: Option<Scalar>,
    authors: Option<DblpAuthors>,
    #[serde(rename = "type")]
    pub_type: Option<String>,
    venue: Option<OneOrMany<String>>,
    volume: Option<Scalar>,
    number: Option<Scalar>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DblpAuthors {
    #[serde(default)]
    author: OneOrMany<DblpAuthor>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DblpAuthor {
    Named { text: String },
    Plain(String),
}

impl DblpAuthor {
    fn into_name(self) -> String {
        match self {
            DblpAuthor::Named { text } => text,
            DblpAuthor::Plain(text) => text,
        }
    }
}

/// DBLP emits a bare value instead of a one-element array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A string that DBLP occasionally sends as a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

/// A required field was absent from a hit
#[derive(Debug)]
struct MissingField {
    key: Option<String>,
    field: &'static str,
}

impl DblpInfo {
    fn into_hit(self) -> Result<SearchHit, MissingField> {
        let key = self.key;
        let Some(title) = self.title else {
            return Err(MissingField { key, field: "title" });
        };
        let Some(year) = self.year else {
            return Err(MissingField { key, field: "year" });
        };

        let authors = self
            .authors
            .map(|authors| {
                authors
                    .author
                    .into_vec()
                    .into_iter()
                    .map(DblpAuthor::into_name)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let venue = self
            .venue
            .map(|venue| venue.into_vec().join(", "))
            .unwrap_or_default();

        let mut builder = HitBuilder::new(title, year.into_string())
            .authors(authors)
            .pub_type(self.pub_type.unwrap_or_default())
            .venue(venue);
        if let Some(volume) = self.volume {
            builder = builder.volume(volume.into_string());
        }
        if let Some(number) = self.number {
            builder = builder.number(number.into_string());
        }
        if let Some(key) = key {
            builder = builder.key(key);
        }
        Ok(builder.build())
    }
}
