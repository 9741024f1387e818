//! Scoring functions shared by the normalization passes.
//!
//! This module contains:
//! - English-density scoring (used to pick a preferred spelling)
//! - Similarity ratio over longest matching blocks (used to cluster spellings)

use std::cmp::Ordering;

// ============================================================================
// Thresholds
// ============================================================================

/// Two strings are "similar" when their ratio is strictly above this.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Video candidates whose title ratio to the query is above this are accepted.
pub const VIDEO_TITLE_THRESHOLD: f64 = 0.6;

// ============================================================================
// English Density
// ============================================================================

/// Score how Latin-letter-dense a string is.
///
/// Returns `chars / ascii_letters`, so pure Latin text scores 1.0 and every
/// non-letter character pushes the score up. Text without any ASCII letter
/// scores 0.0, which is the minimum and therefore sorts first.
pub fn english_score(text: &str) -> f64 {
    let count = text.chars().count();
    let ascii = text.chars().filter(|c| c.is_ascii_alphabetic()).count();

    if ascii == 0 {
        0.0
    } else {
        count as f64 / ascii as f64
    }
}

/// Compare two strings by English-density score (ascending).
pub fn english_cmp(x: &str, y: &str) -> Ordering {
    let x_score = english_score(x);
    let y_score = english_score(y);

    if x_score < y_score {
        Ordering::Less
    } else if x_score > y_score {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Sum of English-density scores over a list of names.
pub fn english_score_sum<'a, I>(names: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(english_score).sum()
}

// ============================================================================
// Similarity
// ============================================================================

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, size)`. Ties resolve to the block that starts earliest in
/// `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    // run[j - blo + 1] = length of the match ending at (i, j)
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut curr = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            curr[j - blo + 1] = k;
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// Total size of all matching blocks, found by recursively splitting around
/// the longest match (Ratcliff/Obershelp).
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut queue = vec![((0, a.len()), (0, b.len()))];

    while let Some(((alo, ahi), (blo, bhi))) = queue.pop() {
        let (i, j, k) = longest_match(a, b, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push(((alo, i), (blo, j)));
        }
        if i + k < ahi && j + k < bhi {
            queue.push(((i + k, ahi), (j + k, bhi)));
        }
    }

    total
}

/// Similarity ratio in `[0, 1]`: `2 * M / (len(a) + len(b))` where `M` is the
/// number of characters in matching blocks. Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();

    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// True when the ratio between `a` and `b` exceeds [`SIMILARITY_THRESHOLD`].
pub fn is_similar(a: &str, b: &str) -> bool {
    similarity_ratio(a, b) > SIMILARITY_THRESHOLD
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_score_pure_latin() {
        assert_eq!(english_score("BIGBANG"), 1.0);
        assert_eq!(english_score("2NE1"), 2.0);
    }

    #[test]
    fn test_english_score_no_ascii_letters() {
        assert_eq!(english_score("빅뱅"), 0.0);
        assert_eq!(english_score("123"), 0.0);
        assert_eq!(english_score(""), 0.0);
    }

    #[test]
    fn test_english_score_counts_chars_not_bytes() {
        // 5 chars, 2 ASCII letters
        assert_eq!(english_score("IU 아이"), 2.5);
    }

    #[test]
    fn test_english_cmp() {
        assert_eq!(english_cmp("빅뱅", "BIGBANG"), Ordering::Less);
        assert_eq!(english_cmp("BIG BANG", "BIGBANG"), Ordering::Greater);
        assert_eq!(english_cmp("ABC", "XYZ"), Ordering::Equal);
    }

    #[test]
    fn test_english_score_sum() {
        assert_eq!(english_score_sum(["BIGBANG", "2NE1"]), 3.0);
        assert_eq!(english_score_sum(Vec::<&str>::new()), 0.0);
    }

    #[test]
    fn test_similarity_identical_and_disjoint() {
        assert_eq!(similarity_ratio("Fantastic Baby", "Fantastic Baby"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_similarity_matching_blocks() {
        // "abcd" vs "bcde": one block "bcd" -> 2 * 3 / 8
        assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
        // Blocks on both sides of the longest match are counted.
        // "xaby" vs "xcby": "by" then "x" -> 2 * 3 / 8
        assert_eq!(similarity_ratio("xaby", "xcby"), 0.75);
    }

    #[test]
    fn test_similarity_is_symmetric_for_titles() {
        let a = "Bang Bang Bang";
        let b = "BANG BANG BANG";
        assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
    }

    #[test]
    fn test_is_similar_threshold() {
        assert!(is_similar("Fantastic Baby", "Fantastic Baby!"));
        assert!(!is_similar("Fantastic Baby", "판타스틱 베이비"));
        // Exactly 0.8 is not above the threshold: 2 * 4 / 10
        assert!(!is_similar("abcde", "abcdx"));
    }
}
