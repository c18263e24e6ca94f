//! Search hit model representing one candidate record from a metadata provider.

use serde::{Deserialize, Serialize};

/// One candidate publication returned by a provider search.
///
/// Every backend converts its own response shape into this struct, so the
/// normalizer never sees provider-specific JSON or HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Paper title, verbatim from the provider
    pub title: String,

    /// Publication year, kept as an opaque string
    pub year: String,

    /// Author display names, in provider order
    pub authors: Vec<String>,

    /// Free-form publication type label (e.g. "Journal Articles")
    pub pub_type: String,

    /// Venue name (journal, conference or anything else)
    pub venue: String,

    /// Journal volume, when the provider supplied one
    pub volume: Option<String>,

    /// Journal issue number, when the provider supplied one
    pub number: Option<String>,

    /// Provider-native unique key (DBLP record key, Scholar cluster id)
    pub key: Option<String>,
}

impl SearchHit {
    /// Create a new hit with required fields
    pub fn new(title: String, year: String) -> Self {
        Self {
            title,
            year,
            authors: Vec::new(),
            pub_type: String::new(),
            venue: String::new(),
            volume: None,
            number: None,
            key: None,
        }
    }

    /// Display name of the first author, if any
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Identifier used in diagnostics: the native key, else the title
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.title)
    }
}

/// Builder for constructing SearchHit objects
#[derive(Debug, Clone)]
pub struct HitBuilder {
    hit: SearchHit,
}

impl HitBuilder {
    /// Create a new builder with required fields
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            hit: SearchHit::new(title.into(), year.into()),
        }
    }

    /// Append one author
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.hit.authors.push(name.into());
        self
    }

    /// Replace the author list
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hit.authors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the publication type label
    pub fn pub_type(mut self, label: impl Into<String>) -> Self {
        self.hit.pub_type = label.into();
        self
    }

    /// Set the venue name
    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.hit.venue = venue.into();
        self
    }

    /// Set volume
    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.hit.volume = Some(volume.into());
        self
    }

    /// Set issue number
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.hit.number = Some(number.into());
        self
    }

    /// Set the provider-native key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.hit.key = Some(key.into());
        self
    }

    /// Build the SearchHit
    pub fn build(self) -> SearchHit {
        self.hit
    }
}
