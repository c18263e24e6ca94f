//! Citation key strategies.
//!
//! A key is derived from the first author's display name and the year. How
//! the surname is picked out of the display name is a policy choice, so it
//! lives behind [`CitationKeyStrategy`] and is selected with [`KeyPolicy`].

use serde::{Deserialize, Serialize};

use crate::models::SearchHit;

/// Derives a citation key for one hit
pub trait CitationKeyStrategy: Send + Sync + std::fmt::Debug {
    fn key_for(&self, hit: &SearchHit) -> String;
}

/// Configurable choice of key strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Second whitespace token of the first author, then the year
    #[default]
    SecondToken,
    /// Last whitespace token of the first author, then the year
    LastToken,
    /// Provider-native key when present, else `SecondToken`
    ProviderKey,
}

impl KeyPolicy {
    /// The strategy implementing this policy
    pub fn strategy(self) -> Box<dyn CitationKeyStrategy> {
        match self {
            KeyPolicy::SecondToken => Box::new(SecondToken),
            KeyPolicy::LastToken => Box::new(LastToken),
            KeyPolicy::ProviderKey => Box::new(ProviderKey),
        }
    }
}

/// `"Jane Q. Doe"` + `"2020"` gives `"Q.2020"`.
///
/// Assumes `"First Last"` names. Middle names and initials take the surname's
/// place, which is the long-standing behaviour of this tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondToken;

impl CitationKeyStrategy for SecondToken {
    fn key_for(&self, hit: &SearchHit) -> String {
        let surname = hit
            .first_author()
            .and_then(|name| {
                let mut tokens = name.split_whitespace();
                let first = tokens.next();
                tokens.next().or(first)
            })
            .unwrap_or_default();
        format!("{}{}", surname, hit.year)
    }
}

/// `"Jane Q. Doe"` + `"2020"` gives `"Doe2020"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastToken;

impl CitationKeyStrategy for LastToken {
    fn key_for(&self, hit: &SearchHit) -> String {
        let surname = hit
            .first_author()
            .and_then(|name| name.split_whitespace().last())
            .unwrap_or_default();
        format!("{}{}", surname, hit.year)
    }
}

/// Uses the provider's own record key (e.g. `conf/icse/Lee19`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderKey;

impl CitationKeyStrategy for ProviderKey {
    fn key_for(&self, hit: &SearchHit) -> String {
        match hit.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => SecondToken.key_for(hit),
        }
    }
}
