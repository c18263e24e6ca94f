//! Normalized bibliographic entry, the input of the BibTeX writer.

use serde::{Deserialize, Serialize};

/// BibTeX entry type produced by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Article,
    InProceedings,
    Misc,
}

impl EntryType {
    /// Classify a provider publication type label.
    ///
    /// Returns `None` for labels outside the fixed lookup table.
    pub fn classify(label: &str) -> Option<Self> {
        match label {
            "Conference and Workshop Papers" => Some(EntryType::InProceedings),
            "Journal Articles" => Some(EntryType::Article),
            _ => None,
        }
    }

    /// The venue field that pairs with this entry type
    pub fn venue_field(self) -> VenueField {
        match self {
            EntryType::Article => VenueField::Journal,
            EntryType::InProceedings => VenueField::Booktitle,
            EntryType::Misc => VenueField::HowPublished,
        }
    }

    /// Lower-case BibTeX name (`article`, `inproceedings`, `misc`)
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Article => "article",
            EntryType::InProceedings => "inproceedings",
            EntryType::Misc => "misc",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name that carries the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueField {
    Journal,
    Booktitle,
    HowPublished,
}

impl VenueField {
    pub fn as_str(self) -> &'static str {
        match self {
            VenueField::Journal => "journal",
            VenueField::Booktitle => "booktitle",
            VenueField::HowPublished => "howpublished",
        }
    }
}

impl std::fmt::Display for VenueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bibliographic record ready for serialization.
///
/// The venue field name is derived from `entry_type`, so an entry always
/// carries exactly one venue field and it always matches its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub entry_type: EntryType,
    /// Citation key; not guaranteed unique within a batch
    pub id: String,
    pub title: String,
    /// Authors joined by `" and "`
    pub author: String,
    pub year: String,
    pub venue: String,
    pub volume: Option<String>,
    pub number: Option<String>,
}

impl NormalizedEntry {
    /// Name of the populated venue field
    pub fn venue_field(&self) -> VenueField {
        self.entry_type.venue_field()
    }

    /// Fields in output order, skipping absent optional ones
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("title", self.title.as_str()),
            ("author", self.author.as_str()),
            ("year", self.year.as_str()),
            (self.venue_field().as_str(), self.venue.as_str()),
        ];
        if let Some(volume) = &self.volume {
            fields.push(("volume", volume.as_str()));
        }
        if let Some(number) = &self.number {
            fields.push(("number", number.as_str()));
        }
        fields
    }
}
