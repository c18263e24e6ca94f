//! # pdf2bibtex
//!
//! Turn a paper's PDF (or just its title) into BibTeX by looking it up in a
//! bibliographic metadata service.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`title`]: Title sources (manual override, PDF text)
//! - [`sources`]: Metadata providers behind the [`Source`] trait (DBLP, Google Scholar)
//! - [`models`]: Search hits and normalized bibliographic entries
//! - [`bibtex`]: Record normalization, citation keys and the BibTeX writer
//! - [`pipeline`]: One sequential run from title to BibTeX text
//! - [`report`]: Injected diagnostics
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client and retry helpers

pub mod bibtex;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod title;
pub mod utils;

// Re-export commonly used types
pub use error::Error;
pub use models::{NormalizedEntry, SearchHit};
pub use pipeline::Pipeline;
pub use sources::{Source, SourceKind};
