//! Similarity clusters over distinct strings.
//!
//! An adjacency map built in one ordered pass: every key starts as its own
//! cluster, and for each ordered pair `(outer, inner)` judged similar, each
//! is added to the other's cluster. A cluster therefore holds a key plus its
//! direct neighbours only, listed in first-seen order, so similar keys with
//! the same neighbours see the same member list. This is not a transitive closure: with
//! `A ~ B ~ C` but not `A ~ C`, `A` and `C` land in different clusters and
//! may collapse to different representatives.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use crate::scoring::{english_cmp, is_similar};

#[derive(Debug, Default)]
pub struct SimilarityClusters {
    keys: Vec<String>,
    index: FxHashMap<String, usize>,
    // member indices per key, ascending (first-seen order)
    members: Vec<Vec<usize>>,
}

impl SimilarityClusters {
    /// Cluster with the default similarity test.
    pub fn build<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build_with(items, is_similar)
    }

    /// Cluster with a custom similarity test. Duplicate items collapse onto
    /// the first occurrence.
    pub fn build_with<I, S, F>(items: I, similar: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str, &str) -> bool,
    {
        let mut clusters = Self::default();

        for item in items {
            let item = item.into();
            if !clusters.index.contains_key(&item) {
                let idx = clusters.keys.len();
                clusters.index.insert(item.clone(), idx);
                clusters.keys.push(item);
                clusters.members.push(vec![idx]);
            }
        }

        let n = clusters.keys.len();
        for outer in 0..n {
            for inner in 0..n {
                if similar(&clusters.keys[outer], &clusters.keys[inner]) {
                    push_unique(&mut clusters.members[inner], outer);
                    push_unique(&mut clusters.members[outer], inner);
                }
            }
        }

        for members in &mut clusters.members {
            members.sort_unstable();
        }

        clusters
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Cluster of `key` in first-seen order, or `None` for an unknown key.
    pub fn members(&self, key: &str) -> Option<Vec<&str>> {
        let idx = *self.index.get(key)?;
        Some(
            self.members[idx]
                .iter()
                .map(|&member| self.keys[member].as_str())
                .collect(),
        )
    }

    /// Collapse every cluster to one representative chosen by `pick`.
    /// Returns key → representative for every key.
    pub fn collapse<F>(&self, pick: F) -> FxHashMap<String, String>
    where
        F: Fn(&[&str]) -> String,
    {
        self.keys
            .iter()
            .enumerate()
            .map(|(idx, key)| {
                let members: Vec<&str> = self.members[idx]
                    .iter()
                    .map(|&member| self.keys[member].as_str())
                    .collect();
                (key.clone(), pick(&members))
            })
            .collect()
    }
}

fn push_unique(members: &mut Vec<usize>, idx: usize) {
    if !members.contains(&idx) {
        members.push(idx);
    }
}

fn by_english_density(a: &&str, b: &&str) -> Ordering {
    english_cmp(a, b)
}

/// Lowest English-density score wins; ties go to the lexicographically
/// smallest member.
pub fn pick_lexical_first(members: &[&str]) -> String {
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    sorted.sort_by(by_english_density);
    sorted.first().map(|s| s.to_string()).unwrap_or_default()
}

/// Lowest English-density score wins; ties go to the first member, which
/// is the earliest-seen key when `members` comes from a cluster.
pub fn pick_first_seen(members: &[&str]) -> String {
    let mut sorted = members.to_vec();
    sorted.sort_by(by_english_density);
    sorted.first().map(|s| s.to_string()).unwrap_or_default()
}
