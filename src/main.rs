use anyhow::{Context, Result};
use clap::Parser;
use pdf2bibtex::bibtex::KeyPolicy;
use pdf2bibtex::config::{find_config_file, load_config, Config};
use pdf2bibtex::report::{Reporter, TracingReporter};
use pdf2bibtex::title::resolve_title;
use pdf2bibtex::{Pipeline, SourceKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pdf2bibtex - Look up a paper by its PDF or title and print its BibTeX entry
#[derive(Parser, Debug)]
#[command(name = "pdf2bibtex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up a paper by its PDF or title and print its BibTeX entry", long_about = None)]
struct Cli {
    /// PDF file to read the title from
    #[arg(long, short, required_unless_present_any = ["title", "dump_config"])]
    pdf: Option<PathBuf>,

    /// Title to search for instead of the one in the PDF
    #[arg(long, short)]
    title: Option<String>,

    /// Enable debug logging
    #[arg(long, short, conflicts_with = "quiet")]
    log: bool,

    /// Only log errors
    #[arg(long, short)]
    quiet: bool,

    /// Metadata provider to query
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// How citation keys are derived
    #[arg(long, value_enum)]
    key_policy: Option<KeyPolicy>,

    /// Proxy URL for provider requests (e.g. socks5h://127.0.0.1:9050)
    #[arg(long)]
    proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of hits to request
    #[arg(long)]
    max_hits: Option<usize>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.source {
            config.provider.kind = kind;
        }
        if let Some(policy) = self.key_policy {
            config.keys.policy = policy;
        }
        if let Some(proxy) = &self.proxy {
            config.proxy.url = Some(proxy.clone());
        }
        if let Some(timeout) = self.timeout {
            config.provider.timeout_secs = timeout;
        }
        if let Some(max_hits) = self.max_hits {
            config.provider.max_hits = Some(max_hits);
        }
    }

    fn log_level<'a>(&self, config: &'a Config) -> &'a str {
        if self.log {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            &config.logging.level
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in the default location
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref())?;
    cli.apply(&mut config);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("pdf2bibtex={}", cli.log_level(&config))),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    if cli.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);

    let title = resolve_title(cli.title.as_deref(), cli.pdf.as_deref())?;
    if cli.title.is_none() {
        reporter.info(&format!("extracted title from pdf: {:?}", title));
    }

    let pipeline = Pipeline::from_config(&config, reporter)?;
    let output = pipeline
        .bibtex_for(&title)
        .await
        .with_context(|| format!("lookup of \"{}\" failed", title))?;

    print!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_requires_pdf_or_title() {
        assert!(Cli::try_parse_from(["pdf2bibtex"]).is_err());

        let cli = Cli::parse_from(["pdf2bibtex", "-p", "paper.pdf"]);
        assert_eq!(cli.pdf, Some(PathBuf::from("paper.pdf")));
        assert!(cli.title.is_none());

        let cli = Cli::parse_from(["pdf2bibtex", "-t", "A Study"]);
        assert!(cli.pdf.is_none());
        assert_eq!(cli.title.as_deref(), Some("A Study"));

        let cli = Cli::parse_from(["pdf2bibtex", "--dump-config"]);
        assert!(cli.dump_config);
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["pdf2bibtex", "-t", "x"]);
        assert!(!cli.log);
        assert!(!cli.quiet);
        assert!(cli.source.is_none());
        assert!(cli.key_policy.is_none());
        assert!(cli.proxy.is_none());
        assert!(cli.timeout.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_log_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["pdf2bibtex", "-t", "x", "-l", "-q"]).is_err());
    }

    #[test]
    fn test_cli_value_enums() {
        let cli = Cli::parse_from([
            "pdf2bibtex",
            "-t",
            "x",
            "--source",
            "google-scholar",
            "--key-policy",
            "last-token",
        ]);
        assert_eq!(cli.source, Some(SourceKind::GoogleScholar));
        assert_eq!(cli.key_policy, Some(KeyPolicy::LastToken));

        assert!(Cli::try_parse_from(["pdf2bibtex", "-t", "x", "--source", "bing"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "pdf2bibtex",
            "-t",
            "x",
            "--source",
            "google-scholar",
            "--key-policy",
            "provider-key",
            "--proxy",
            "socks5h://127.0.0.1:9050",
            "--timeout",
            "5",
            "--max-hits",
            "3",
        ]);

        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.provider.kind, SourceKind::GoogleScholar);
        assert_eq!(config.keys.policy, KeyPolicy::ProviderKey);
        assert_eq!(config.proxy.url.as_deref(), Some("socks5h://127.0.0.1:9050"));
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.provider.max_hits, Some(3));
    }

    #[test]
    fn test_log_level_selection() {
        let config = Config::default();

        let cli = Cli::parse_from(["pdf2bibtex", "-t", "x"]);
        assert_eq!(cli.log_level(&config), "warn");

        let cli = Cli::parse_from(["pdf2bibtex", "-t", "x", "-l"]);
        assert_eq!(cli.log_level(&config), "debug");

        let cli = Cli::parse_from(["pdf2bibtex", "-t", "x", "-q"]);
        assert_eq!(cli.log_level(&config), "error");
    }
}
