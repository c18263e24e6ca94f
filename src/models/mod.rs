//! Core data models: provider hits and normalized bibliographic entries.

mod entry;
mod hit;
mod search;

pub use entry::{EntryType, NormalizedEntry, VenueField};
pub use hit::{HitBuilder, SearchHit};
pub use search::SearchQuery;
