//! Substitution cache: raw spelling → preferred spelling.
//!
//! Written when bilingual credits are split and when cross-chart
//! reconciliation replaces a single artist; read whenever an artist's
//! display name is needed. Owned by whoever drives normalization and passed
//! in explicitly, so its lifetime is the caller's choice.

use rustc_hash::FxHashMap;

use crate::artist::ArtistIdentity;

#[derive(Clone, Debug, Default)]
pub struct SubstitutionCache {
    substitutions: FxHashMap<String, String>,
}

impl SubstitutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the alias → extracted-name mapping carried by an identity.
    pub fn record_alias(&mut self, artist: &ArtistIdentity) {
        if let Some(alias) = artist.alias() {
            self.insert(alias, artist.extracted());
        }
    }

    /// Record that `from` should display as `to`. Later writes win.
    pub fn insert(&mut self, from: &str, to: &str) {
        log::debug!("substitution: {:?} -> {:?}", from, to);
        self.substitutions.insert(from.to_string(), to.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.substitutions.get(name).map(String::as_str)
    }

    /// Preferred spelling for `name`, or `name` itself. Single lookup, no chaining.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    pub fn clear(&mut self) {
        self.substitutions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.substitutions
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionCache {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            substitutions: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}
