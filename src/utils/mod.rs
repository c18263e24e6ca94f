//! Utility modules supporting provider queries.
//!
//! - [`HttpClient`]: shared `reqwest` client with timeout and optional proxy
//! - [`RetryConfig`] / [`with_retry`]: bounded retry of transient provider errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use pdf2bibtex::report::TracingReporter;
//! use pdf2bibtex::utils::{with_retry, RetryConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RetryConfig::with_retries(2);
//! let body = with_retry(config, &TracingReporter, || async { Ok("data") }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::{HttpClient, HttpClientBuilder};
pub use retry::{with_retry, RetryConfig};
