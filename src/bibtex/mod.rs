//! BibTeX generation.
//!
//! - [`Normalizer`]: maps provider hits onto [`NormalizedEntry`](crate::models::NormalizedEntry)s
//! - [`KeyPolicy`] / [`CitationKeyStrategy`]: pluggable citation key derivation
//! - [`BibtexWriter`]: renders entries as BibTeX text

mod keys;
mod normalize;
mod writer;

pub use keys::{CitationKeyStrategy, KeyPolicy, LastToken, ProviderKey, SecondToken};
pub use normalize::{Normalizer, AUTHOR_SEPARATOR};
pub use writer::{escape_value, sanitize_key, BibtexWriter};
