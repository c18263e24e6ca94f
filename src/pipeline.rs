//! One run: search the provider for a title, normalize the hits, render BibTeX.

use std::sync::Arc;
use std::time::Duration;

use crate::bibtex::{BibtexWriter, Normalizer};
use crate::config::Config;
use crate::error::Error;
use crate::models::{NormalizedEntry, SearchQuery};
use crate::report::Reporter;
use crate::sources::{create_source, Source};
use crate::utils::HttpClient;

/// Sequential title-to-BibTeX pipeline
#[derive(Debug)]
pub struct Pipeline {
    source: Box<dyn Source>,
    normalizer: Normalizer,
    writer: BibtexWriter,
    reporter: Arc<dyn Reporter>,
    max_hits: Option<usize>,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn Source>,
        normalizer: Normalizer,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            source,
            normalizer,
            writer: BibtexWriter::new(),
            reporter,
            max_hits: None,
        }
    }

    /// Build the provider, key policy and HTTP client from configuration
    pub fn from_config(config: &Config, reporter: Arc<dyn Reporter>) -> Result<Self, Error> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .proxy(config.proxy.url.clone())
            .build()?;

        let source = create_source(&config.provider, client, reporter.clone());
        let normalizer = Normalizer::new(config.keys.policy.strategy(), reporter.clone());

        Ok(Self::new(source, normalizer, reporter).max_hits(config.provider.max_hits))
    }

    /// Limit the number of hits requested from the provider
    pub fn max_hits(mut self, max_hits: Option<usize>) -> Self {
        self.max_hits = max_hits;
        self
    }

    pub fn source(&self) -> &dyn Source {
        self.source.as_ref()
    }

    /// Search and normalize, without rendering
    pub async fn entries_for(&self, title: &str) -> Result<Vec<NormalizedEntry>, Error> {
        let query = SearchQuery::new(title).max_hits(self.max_hits);
        let hits = self.source.search(&query).await?;

        if hits.is_empty() {
            self.reporter
                .warn(&format!("{} returned no results for \"{}\"", self.source.name(), title));
        }

        Ok(self.normalizer.normalize_all(&hits))
    }

    /// BibTeX text for every hit the provider returns for `title`
    pub async fn bibtex_for(&self, title: &str) -> Result<String, Error> {
        let entries = self.entries_for(title).await?;
        Ok(self.writer.write(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bibtex::KeyPolicy;
    use crate::report::RecordingReporter;
    use crate::sources::mock::{make_hit, MockSource};
    use crate::sources::SourceError;

    fn pipeline(source: MockSource, reporter: Arc<RecordingReporter>) -> Pipeline {
        let normalizer = Normalizer::new(KeyPolicy::SecondToken.strategy(), reporter.clone());
        Pipeline::new(Box::new(source), normalizer, reporter)
    }

    #[tokio::test]
    async fn test_bibtex_for_single_hit() {
        let reporter = Arc::new(RecordingReporter::new());
        let source = MockSource::with_hits(vec![make_hit(
            "A Study",
            "2019",
            &["Ann Lee"],
            "Conference and Workshop Papers",
            "ICSE",
        )]);

        let output = pipeline(source, reporter.clone())
            .bibtex_for("A Study")
            .await
            .unwrap();

        assert_eq!(
            output,
            "@inproceedings{Lee2019,\n title = {A Study},\n author = {Ann Lee},\n year = {2019},\n booktitle = {ICSE}\n}\n"
        );
        assert!(reporter.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_no_results_warns() {
        let reporter = Arc::new(RecordingReporter::new());
        let output = pipeline(MockSource::new(), reporter.clone())
            .bibtex_for("Nothing")
            .await
            .unwrap();

        assert!(output.is_empty());
        assert_eq!(reporter.warnings().len(), 1);
        assert!(reporter.warnings()[0].contains("no results"));
    }

    #[tokio::test]
    async fn test_status_failure_propagates() {
        let reporter = Arc::new(RecordingReporter::new());
        let source = MockSource::new();
        source.set_failure_status("500");

        let result = pipeline(source, reporter).bibtex_for("A Study").await;
        assert!(matches!(
            result,
            Err(Error::Source(SourceError::Status { .. }))
        ));
    }

    #[tokio::test]
    async fn test_max_hits_forwarded() {
        let reporter = Arc::new(RecordingReporter::new());
        let source = MockSource::new();
        let pipeline = pipeline(source.clone(), reporter).max_hits(Some(3));

        pipeline.entries_for("A Study").await.unwrap();
        let queries = source.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].title, "A Study");
        assert_eq!(queries[0].max_hits, Some(3));
    }

    #[test]
    fn test_from_config_rejects_bad_proxy() {
        let mut config = Config::default();
        config.proxy.url = Some("not a proxy url".to_string());

        let result = Pipeline::from_config(&config, Arc::new(RecordingReporter::new()));
        assert!(matches!(result, Err(Error::Source(SourceError::InvalidRequest(_)))));
    }

    #[test]
    fn test_from_config_selects_provider() {
        let mut config = Config::default();
        config.provider.kind = crate::sources::SourceKind::GoogleScholar;

        let pipeline = Pipeline::from_config(&config, Arc::new(RecordingReporter::new())).unwrap();
        assert_eq!(pipeline.source().id(), "google_scholar");
    }
}
