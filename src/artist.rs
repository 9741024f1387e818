//! Artist identities and artist-group labels.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::cache::SubstitutionCache;
use crate::normalize::{fix_encoding, split_bilingual};

/// One credited artist.
///
/// Equality and hashing use the extracted name (after encoding repair and
/// bilingual splitting), never the display name, so two identities that
/// display the same through the cache are still different keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ArtistIdentity {
    name: String,
    alias: Option<String>,
}

impl ArtistIdentity {
    /// Parse a raw credit: repair encoding, then split "A (B)" credits.
    pub fn new(raw: &str) -> Self {
        let repaired = fix_encoding(raw);
        let (name, alias) = split_bilingual(&repaired);
        Self { name, alias }
    }

    /// Identity for an already-extracted name; no parsing.
    pub fn from_extracted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn extracted(&self) -> &str {
        &self.name
    }

    /// Non-preferred spelling found in a bilingual credit.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Name to show: the cache entry for the extracted name, or the name itself.
    pub fn display<'a>(&'a self, cache: &'a SubstitutionCache) -> &'a str {
        cache.resolve(&self.name)
    }
}

impl PartialEq for ArtistIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ArtistIdentity {}

impl Hash for ArtistIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl From<String> for ArtistIdentity {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for ArtistIdentity {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<ArtistIdentity> for String {
    fn from(artist: ArtistIdentity) -> Self {
        artist.name
    }
}

/// Display names of `artists`, deduplicated and sorted.
pub fn display_names(artists: &[ArtistIdentity], cache: &SubstitutionCache) -> Vec<String> {
    let mut names: Vec<String> = artists
        .iter()
        .map(|artist| artist.display(cache).to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Composite label for an artist group: "Crush, Zico".
pub fn group_label(artists: &[ArtistIdentity], cache: &SubstitutionCache) -> String {
    display_names(artists, cache).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_new_extracts_latin_spelling() {
        let artist = ArtistIdentity::new("2NE1 (투애니원)");
        assert_eq!(artist.extracted(), "2NE1");
        assert_eq!(artist.alias(), Some("투애니원"));
    }

    #[test]
    fn test_new_repairs_encoding() {
        let garbled: String = "빅뱅".as_bytes().iter().map(|&b| b as char).collect();
        assert_eq!(ArtistIdentity::new(&garbled).extracted(), "빅뱅");
    }

    #[test]
    fn test_display_goes_through_cache() {
        let cache: SubstitutionCache = [("빅뱅", "BIGBANG")].into_iter().collect();
        let artist = ArtistIdentity::new("빅뱅");
        assert_eq!(artist.display(&cache), "BIGBANG");
        assert_eq!(artist.extracted(), "빅뱅");
    }

    #[test]
    fn test_equality_uses_extracted_name() {
        let cache: SubstitutionCache = [("빅뱅", "BIGBANG")].into_iter().collect();
        let korean = ArtistIdentity::new("빅뱅");
        let latin = ArtistIdentity::new("BIGBANG");

        assert_eq!(korean.display(&cache), latin.display(&cache));
        assert_ne!(korean, latin);

        let set: FxHashSet<ArtistIdentity> = [korean, latin, ArtistIdentity::new("BIGBANG")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_group_label_sorted_and_deduplicated() {
        let cache: SubstitutionCache = [("크러쉬", "Crush")].into_iter().collect();
        let artists = vec![
            ArtistIdentity::new("Zico"),
            ArtistIdentity::new("크러쉬"),
            ArtistIdentity::new("Crush"),
        ];
        assert_eq!(group_label(&artists, &cache), "Crush, Zico");
    }

    #[test]
    fn test_serde_round_trip_uses_extracted_name() {
        let artist: ArtistIdentity = serde_json::from_str("\"2NE1 (투애니원)\"").unwrap();
        assert_eq!(artist.extracted(), "2NE1");
        assert_eq!(serde_json::to_string(&artist).unwrap(), "\"2NE1\"");
    }
}
