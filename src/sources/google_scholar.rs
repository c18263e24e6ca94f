//! Google Scholar metadata source.
//!
//! Google Scholar has no public API; this source fetches the regular result
//! page and reads each result's title and byline. Scholar rate-limits
//! aggressively and answers automated traffic with a captcha page, which is
//! reported as [`SourceError::Blocked`].
//!
//! Scholar gives no publication type, so its hits carry an empty type label
//! and end up as `misc` entries.

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use url::Url;

use crate::models::{HitBuilder, SearchHit, SearchQuery};
use crate::report::Reporter;
use crate::sources::{Source, SourceError};
use crate::utils::{with_retry, HttpClient, RetryConfig};

const GOOGLE_SCHOLAR_URL: &str = "https://scholar.google.com/scholar";

/// Scholar serves at most this many results per page
const MAX_RESULTS_PER_PAGE: usize = 20;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Google Scholar metadata source
#[derive(Debug, Clone)]
pub struct GoogleScholarSource {
    client: HttpClient,
    reporter: Arc<dyn Reporter>,
    base_url: String,
    retry: RetryConfig,
}

impl GoogleScholarSource {
    pub fn new(client: HttpClient, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client,
            reporter,
            base_url: GOOGLE_SCHOLAR_URL.to_string(),
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
        let mut params = vec![("hl", "en".to_string()), ("q", query.title.clone())];
        if let Some(max_hits) = query.max_hits {
            params.push(("num", max_hits.min(MAX_RESULTS_PER_PAGE).to_string()));
        }
        Ok(Url::parse_with_params(&self.base_url, &params)?)
    }

    /// Extract hits from a result page.
    ///
    /// Results whose byline has no year are skipped with a warning.
    pub fn parse_results(&self, html: &str) -> Result<Vec<SearchHit>, SourceError> {
        if is_captcha_page(html) {
            return Err(SourceError::Blocked(
                "Google Scholar answered with a captcha page".to_string(),
            ));
        }

        let document = Html::parse_document(html);
        let result_sel = selector("div.gs_ri")?;
        let title_sel = selector("h3.gs_rt")?;
        let byline_sel = selector("div.gs_a")?;

        let mut hits = Vec::new();
        for result in document.select(&result_sel) {
            let Some(title) = result
                .select(&title_sel)
                .next()
                .map(|h3| clean_title(&element_text(h3)))
                .filter(|t| !t.is_empty())
            else {
                self.reporter
                    .warn("skipping malformed Google Scholar result: missing title");
                continue;
            };

            let byline = result
                .select(&byline_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let byline = parse_byline(&byline);

            let Some(year) = byline.year else {
                self.reporter.warn(&format!(
                    "skipping malformed Google Scholar result {:?}: missing year",
                    title
                ));
                continue;
            };

            let mut builder = HitBuilder::new(title, year)
                .authors(byline.authors)
                .venue(byline.venue);
            if let Some(cid) = cluster_id(result) {
                builder = builder.key(cid);
            }
            hits.push(builder.build());
        }

        Ok(hits)
    }
}

#[async_trait]
impl Source for GoogleScholarSource {
    fn id(&self) -> &str {
        "google_scholar"
    }

    fn name(&self) -> &str {
        "Google Scholar"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SourceError> {
        self.reporter.info("grabbing records from google scholar");
        let url = self.request_url(query)?;

        let body = with_retry(self.retry, self.reporter.as_ref(), || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(url.as_str())
                    .header("User-Agent", BROWSER_USER_AGENT)
                    .send()
                    .await
                    .map_err(|e| {
                        SourceError::Network(format!("Failed to search Google Scholar: {}", e))
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Api {
                        status: status.as_u16(),
                        message: format!("Google Scholar returned status: {}", status),
                    });
                }

                response.text().await.map_err(|e| {
                    SourceError::Network(format!("Failed to read Google Scholar response: {}", e))
                })
            }
        })
        .await?;

        self.reporter
            .info(&format!("request submitted via {}", url));

        self.parse_results(&body)
    }
}

// ========== Helper Functions ==========

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("selector {}: {}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
}

fn is_captcha_page(html: &str) -> bool {
    html.contains("gs_captcha") || html.contains("unusual traffic")
}

/// Scholar's cluster id sits on the element wrapping the result body
fn cluster_id(result: ElementRef<'_>) -> Option<String> {
    result
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.value().attr("data-cid"))
        .map(str::to_string)
}

/// Drop `[PDF]`, `[HTML]`, `[CITATION][C]` style prefixes and collapse whitespace
fn clean_title(raw: &str) -> String {
    let without_tags = match Regex::new(r"^\s*(?:\[[A-Z]+\]\s*)+") {
        Ok(re) => re.replace(raw, "").into_owned(),
        Err(_) => raw.to_string(),
    };
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parts of a result byline such as `A Lee, B Jones - ICSE, 2019 - ieee.org`
#[derive(Debug, Default, PartialEq, Eq)]
struct Byline {
    authors: Vec<String>,
    venue: String,
    year: Option<String>,
}

fn parse_byline(byline: &str) -> Byline {
    let mut segments = byline.split(" - ").map(str::trim);

    let authors = segments
        .next()
        .unwrap_or_default()
        .split(',')
        .map(|name| name.trim().trim_end_matches('…').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let publication = segments.next().unwrap_or_default();
    let (venue, year) = match Regex::new(r"(?:^|[,\s])(\d{4})\s*$")
        .ok()
        .and_then(|re| re.captures(publication))
    {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let venue = publication[..whole].trim().trim_end_matches(',').trim();
            (venue.to_string(), caps.get(1).map(|m| m.as_str().to_string()))
        }
        None => (publication.to_string(), None),
    };

    Byline {
        authors,
        venue: venue.trim_end_matches('…').trim().to_string(),
        year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;

    const RESULTS_PAGE: &str = r##"<html><body><div id="gs_res_ccl_mid">
<div class="gs_r gs_or gs_scl" data-cid="AbCdEf123" data-did="AbCdEf123">
  <div class="gs_ri">
    <h3 class="gs_rt"><span class="gs_ctg2">[PDF]</span> <a href="https://example.org/a.pdf">A Study</a></h3>
    <div class="gs_a">A Lee, B Jones&nbsp;- International Conference on Software Engineering, 2019&nbsp;- ieeexplore.ieee.org</div>
    <div class="gs_rs">Abstract text</div>
  </div>
</div>
<div class="gs_r gs_or gs_scl" data-cid="XyZ987">
  <div class="gs_ri">
    <h3 class="gs_rt"><span class="gs_ctu"><span class="gs_ct1">[CITATION]</span><span class="gs_ct2">[C]</span></span> Another   Study</h3>
    <div class="gs_a">C King - 2020</div>
  </div>
</div>
<div class="gs_r gs_or gs_scl" data-cid="NoYear">
  <div class="gs_ri">
    <h3 class="gs_rt"><a href="#">Undated Thing</a></h3>
    <div class="gs_a">D Nobody - Some Blog</div>
  </div>
</div>
</div></body></html>"##;

    fn source(reporter: &Arc<RecordingReporter>) -> GoogleScholarSource {
        GoogleScholarSource::new(
            HttpClient::new().unwrap(),
            Arc::clone(reporter) as Arc<dyn Reporter>,
        )
    }

    #[test]
    fn test_parse_results_page() {
        let reporter = Arc::new(RecordingReporter::new());
        let hits = source(&reporter).parse_results(RESULTS_PAGE).unwrap();

        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].title, "A Study");
        assert_eq!(hits[0].authors, vec!["A Lee", "B Jones"]);
        assert_eq!(hits[0].venue, "International Conference on Software Engineering");
        assert_eq!(hits[0].year, "2019");
        assert_eq!(hits[0].key.as_deref(), Some("AbCdEf123"));
        assert_eq!(hits[0].pub_type, "");

        assert_eq!(hits[1].title, "Another Study");
        assert_eq!(hits[1].authors, vec!["C King"]);
        assert_eq!(hits[1].venue, "");
        assert_eq!(hits[1].year, "2020");

        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Undated Thing"));
    }

    #[test]
    fn test_captcha_page_is_blocked() {
        let reporter = Arc::new(RecordingReporter::new());
        let html = r#"<html><body><div id="gs_captcha_ccl">Please show you're not a robot</div></body></html>"#;
        let result = source(&reporter).parse_results(html);
        assert!(matches!(result, Err(SourceError::Blocked(_))));
    }

    #[test]
    fn test_empty_page() {
        let reporter = Arc::new(RecordingReporter::new());
        let hits = source(&reporter)
            .parse_results("<html><body></body></html>")
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_byline_variants() {
        let byline = parse_byline("J Doe, R Roe… - Nature, 2015 - nature.com");
        assert_eq!(byline.authors, vec!["J Doe", "R Roe"]);
        assert_eq!(byline.venue, "Nature");
        assert_eq!(byline.year.as_deref(), Some("2015"));

        let byline = parse_byline("J Doe - arXiv preprint arXiv:2101.00001, 2021 - arxiv.org");
        assert_eq!(byline.venue, "arXiv preprint arXiv:2101.00001");
        assert_eq!(byline.year.as_deref(), Some("2021"));

        let byline = parse_byline("J Doe");
        assert_eq!(byline.authors, vec!["J Doe"]);
        assert_eq!(byline.year, None);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("[PDF] A Study"), "A Study");
        assert_eq!(clean_title("[CITATION][C] Old  Book"), "Old Book");
        assert_eq!(clean_title("  Plain\n Title "), "Plain Title");
    }

    #[test]
    fn test_request_url() {
        let reporter = Arc::new(RecordingReporter::new());
        let url = source(&reporter)
            .request_url(&SearchQuery::new("A Study").max_hits(Some(50)))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://scholar.google.com/scholar?hl=en&q=A+Study&num=20"
        );
    }

    #[tokio::test]
    async fn test_search_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/scholar")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let reporter = Arc::new(RecordingReporter::new());
        let scholar = source(&reporter).with_base_url(format!("{}/scholar", server.url()));
        let result = scholar.search(&SearchQuery::new("A Study")).await;

        assert!(matches!(result, Err(SourceError::Api { status: 429, .. })));
    }
}
