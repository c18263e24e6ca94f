//! Mapping of provider hits onto normalized BibTeX entries.

use std::sync::Arc;

use super::keys::CitationKeyStrategy;
use crate::models::{EntryType, NormalizedEntry, SearchHit};
use crate::report::Reporter;

/// Separator between author names in the `author` field
pub const AUTHOR_SEPARATOR: &str = " and ";

/// Turns [`SearchHit`]s into [`NormalizedEntry`]s.
#[derive(Debug)]
pub struct Normalizer {
    keys: Box<dyn CitationKeyStrategy>,
    reporter: Arc<dyn Reporter>,
}

impl Normalizer {
    pub fn new(keys: Box<dyn CitationKeyStrategy>, reporter: Arc<dyn Reporter>) -> Self {
        Self { keys, reporter }
    }

    /// Normalize one hit.
    ///
    /// An unrecognized publication type is not an error: the entry becomes
    /// `misc` with a `howpublished` venue and one warning is reported.
    pub fn normalize(&self, hit: &SearchHit) -> NormalizedEntry {
        let entry_type = match EntryType::classify(&hit.pub_type) {
            Some(entry_type) => entry_type,
            None => {
                self.reporter
                    .warn(&format!("unsupported pub type: {}", hit.pub_type));
                EntryType::Misc
            }
        };

        let id = self.keys.key_for(hit);
        self.reporter
            .debug(&format!("processing entry {}, type {}", id, entry_type));

        NormalizedEntry {
            entry_type,
            id,
            title: hit.title.clone(),
            author: hit.authors.join(AUTHOR_SEPARATOR),
            year: hit.year.clone(),
            venue: hit.venue.clone(),
            volume: hit.volume.clone(),
            number: hit.number.clone(),
        }
    }

    /// Normalize every hit, preserving order
    pub fn normalize_all(&self, hits: &[SearchHit]) -> Vec<NormalizedEntry> {
        hits.iter()
            .map(|hit| {
                self.reporter
                    .info(&format!("processing result with id {}", hit.label()));
                self.normalize(hit)
            })
            .collect()
    }
}
