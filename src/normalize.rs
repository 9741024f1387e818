//! Text normalization for scraped chart rows.
//!
//! Title cleaning, bilingual artist-name splitting, credit splitting and
//! encoding repair. The engine and the snapshot loader both go through here.

use encoding_rs::{mem, WINDOWS_1252};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

use crate::scoring::english_cmp;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Parenthetical tags that survive title cleaning: "(Korean Ver.)", "(chinese)".
pub static PRESERVED_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:korean|chinese|japanese)").unwrap());

/// Bilingual artist credit: "2NE1 (투애니원)", "아이유 (IU)".
pub static BILINGUAL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.+)\((.+)\)").unwrap());

/// Number of cleaning passes; the second pass catches what nesting left behind.
pub const TITLE_CLEANING_PASSES: usize = 2;

// ============================================================================
// ENCODING REPAIR
// ============================================================================

/// Undo UTF-8 text that was decoded as Windows-1252 or Latin-1.
/// e.g., "ë¹…ë±…" → "빅뱅", "Donâ€™t" → "Don’t"
///
/// Text that does not re-encode to a single-byte legacy form, or whose bytes
/// are not valid UTF-8, is returned unchanged.
pub fn fix_encoding(text: &str) -> String {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);

    let bytes = if !had_errors {
        bytes
    } else if mem::is_str_latin1(text) {
        // C1 controls left behind by a strict Latin-1 decode
        mem::encode_latin1_lossy(text)
    } else {
        return text.to_string();
    };

    if mem::is_ascii(&bytes) {
        return text.to_string();
    }

    String::from_utf8(bytes.into_owned()).unwrap_or_else(|_| text.to_string())
}

// ============================================================================
// TITLES
// ============================================================================

/// Remove every "(...)" segment whose content does not start with a
/// preserved language tag. A segment ends at the first ")" after its "(".
pub fn strip_untagged_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        let inner = &rest[open + 1..];
        match inner.find(')') {
            Some(close) if !PRESERVED_TAG.is_match(inner) => {
                out.push_str(&rest[..open]);
                rest = &inner[close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = inner;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Clean a chart title for clustering.
/// e.g., "Bang Bang Bang (뱅뱅뱅)" → "Bang Bang Bang",
///       "Lonely (Korean Ver.)" stays as is.
pub fn clean_title(title: &str) -> String {
    let mut result = title.to_string();
    for _ in 0..TITLE_CLEANING_PASSES {
        result = strip_untagged_parentheticals(&result).trim().to_string();
    }
    result
}

/// Cut a title at a trailing "(" that never closes: "Song (Feat." → "Song".
pub fn trim_unbalanced_parenthesis(title: &str) -> String {
    let open = title.rfind('(');
    let close = title.rfind(')');

    match (open, close) {
        (Some(open), None) => title[..open].trim().to_string(),
        (Some(open), Some(close)) if close < open => title[..open].trim().to_string(),
        _ => title.trim().to_string(),
    }
}

// ============================================================================
// ARTISTS
// ============================================================================

/// Split a bilingual credit "A (B)" into the preferred spelling and the alias
/// that should resolve to it.
///
/// The segment with the higher English-density score is kept. Since text
/// without Latin letters scores zero, "2NE1 (투애니원)" and "투애니원 (2NE1)"
/// both resolve to "2NE1". Equal scores keep the whole text.
pub fn split_bilingual(text: &str) -> (String, Option<String>) {
    let Some(caps) = BILINGUAL_NAME.captures(text) else {
        return (text.to_string(), None);
    };

    let first = caps[1].trim();
    let second = caps[2].trim();

    match english_cmp(&caps[1], &caps[2]) {
        Ordering::Equal => (text.trim().to_string(), None),
        Ordering::Greater => (first.to_string(), Some(second.to_string())),
        Ordering::Less => (second.to_string(), Some(first.to_string())),
    }
}

/// Split a scraped credit line into individual artist names.
/// Anything after "|" is dropped and " & " separates like ",".
/// e.g., "Zico & Crush, Dean|Album" → ["Zico", "Crush", "Dean"]
pub fn split_artist_credits(credit: &str) -> Vec<String> {
    let primary = credit.split('|').next().unwrap_or_default();

    primary
        .replace(" & ", ",")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
