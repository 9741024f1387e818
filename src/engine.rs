//! Normalization engine: canonical titles, artists and videos across charts.
//!
//! One pass runs, in order:
//! 1. Seed the substitution cache with bilingual aliases
//! 2. Clean titles (strip untagged parentheticals)
//! 3. Cluster titles and rewrite each to its cluster's canonical spelling
//! 4. Reconcile artist lists between entries with similar titles
//! 5. Cluster artist-group labels and rewrite each entry's artists
//! 6. Copy video links from the first chart to matching entries elsewhere
//!
//! The pass is synchronous and never fails on well-formed charts.

use rustc_hash::FxHashMap;

use crate::artist::{display_names, group_label, ArtistIdentity};
use crate::cache::SubstitutionCache;
use crate::chart::Chart;
use crate::cluster::{pick_first_seen, pick_lexical_first, SimilarityClusters};
use crate::models::NormalizationStats;
use crate::normalize::clean_title;
use crate::scoring::{english_score_sum, similarity_ratio, SIMILARITY_THRESHOLD};

/// (chart index, entry index)
type Position = (usize, usize);

#[derive(Debug, Clone)]
pub struct NormalizationEngine {
    similarity_threshold: f64,
}

impl Default for NormalizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationEngine {
    pub fn new() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_threshold(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    fn similar(&self, a: &str, b: &str) -> bool {
        similarity_ratio(a, b) > self.similarity_threshold
    }

    /// Run one full pass over `charts`, reading and writing `cache`.
    /// The first chart is the video authority.
    pub fn normalize(&self, charts: &mut [Chart], cache: &mut SubstitutionCache) -> NormalizationStats {
        let mut stats = NormalizationStats {
            charts: charts.len(),
            entries: charts.iter().map(Chart::len).sum(),
            ..NormalizationStats::default()
        };

        seed_aliases(charts, cache);
        clean_titles(charts);
        self.canonicalize_titles(charts, &mut stats);
        self.reconcile_artists(charts, cache, &mut stats);
        self.canonicalize_artist_groups(charts, cache, &mut stats);
        propagate_videos(charts, &mut stats);

        log::info!(
            "Normalized {} entries across {} charts: {} title rewrites, {} artist rewrites, {} videos",
            stats.entries,
            stats.charts,
            stats.title_rewrites,
            stats.artist_group_rewrites,
            stats.videos_propagated
        );
        stats.log_phase("normalize");
        stats
    }

    fn canonicalize_titles(&self, charts: &mut [Chart], stats: &mut NormalizationStats) {
        let titles = charts
            .iter()
            .flat_map(|chart| chart.entries().iter().map(|entry| entry.title.clone()));
        let clusters = SimilarityClusters::build_with(titles, |a, b| self.similar(a, b));
        let canonical = clusters.collapse(pick_lexical_first);
        stats.distinct_titles = clusters.len();

        for entry in charts.iter_mut().flat_map(|chart| chart.entries_mut().iter_mut()) {
            if let Some(title) = canonical.get(&entry.title) {
                if *title != entry.title {
                    log::debug!("title: {:?} -> {:?}", entry.title, title);
                    entry.title = title.clone();
                    stats.title_rewrites += 1;
                }
            }
        }
    }

    /// For every ordered pair of entries with similar titles, the entry whose
    /// artist list scores higher overwrites the other's whole list. Single
    /// artist swaps are remembered in the cache.
    fn reconcile_artists(
        &self,
        charts: &mut [Chart],
        cache: &mut SubstitutionCache,
        stats: &mut NormalizationStats,
    ) {
        let positions: Vec<Position> = charts
            .iter()
            .enumerate()
            .flat_map(|(c, chart)| (0..chart.len()).map(move |e| (c, e)))
            .collect();

        for &outer in &positions {
            for &inner in &positions {
                if !self.similar(&charts[outer.0].entries()[outer.1].title, &charts[inner.0].entries()[inner.1].title) {
                    continue;
                }

                let outer_score = artist_score(charts, outer, cache);
                let inner_score = artist_score(charts, inner, cache);

                if inner_score > outer_score {
                    replace_artists(charts, cache, outer, inner, stats);
                } else if outer_score > inner_score {
                    replace_artists(charts, cache, inner, outer, stats);
                }
            }
        }
    }

    fn canonicalize_artist_groups(
        &self,
        charts: &mut [Chart],
        cache: &SubstitutionCache,
        stats: &mut NormalizationStats,
    ) {
        // label -> artists of the first entry carrying it
        let mut groups: FxHashMap<String, Vec<ArtistIdentity>> = FxHashMap::default();
        let mut labels = Vec::new();

        for entry in charts.iter().flat_map(|chart| chart.entries()) {
            let label = group_label(&entry.artists, cache);
            groups
                .entry(label.clone())
                .or_insert_with(|| entry.artists.clone());
            labels.push(label);
        }

        let clusters = SimilarityClusters::build_with(labels.iter().cloned(), |a, b| self.similar(a, b));
        let canonical = clusters.collapse(pick_first_seen);
        stats.distinct_artist_groups = clusters.len();

        let entries = charts.iter_mut().flat_map(|chart| chart.entries_mut().iter_mut());
        for (entry, label) in entries.zip(labels) {
            let canonical_label = &canonical[&label];
            let members = &groups[canonical_label];

            let mut artists: Vec<ArtistIdentity> = display_names(members, cache)
                .iter()
                .map(|name| ArtistIdentity::from_extracted(cache.resolve(name)))
                .collect();
            artists.sort_by(|a, b| a.extracted().cmp(b.extracted()));
            artists.dedup();

            if *canonical_label != label {
                log::debug!("artists: {:?} -> {:?}", label, canonical_label);
                stats.artist_group_rewrites += 1;
            }
            entry.artists = artists;
        }
    }
}

/// Record every bilingual alias carried by the charts' artists.
fn seed_aliases(charts: &[Chart], cache: &mut SubstitutionCache) {
    for entry in charts.iter().flat_map(|chart| chart.entries()) {
        for artist in &entry.artists {
            cache.record_alias(artist);
        }
    }
}

fn clean_titles(charts: &mut [Chart]) {
    for entry in charts.iter_mut().flat_map(|chart| chart.entries_mut().iter_mut()) {
        entry.title = clean_title(&entry.title);
    }
}

/// Sum of English-density scores of an entry's artists, by display name.
fn artist_score(charts: &[Chart], (c, e): Position, cache: &SubstitutionCache) -> f64 {
    english_score_sum(
        charts[c].entries()[e]
            .artists
            .iter()
            .map(|artist| artist.display(cache)),
    )
}

/// Overwrite `target`'s artist list with a copy of `from`'s.
fn replace_artists(
    charts: &mut [Chart],
    cache: &mut SubstitutionCache,
    target: Position,
    from: Position,
    stats: &mut NormalizationStats,
) {
    let replacement = charts[from.0].entries()[from.1].artists.clone();
    let current = &charts[target.0].entries()[target.1].artists;

    if let ([old], [new]) = (current.as_slice(), replacement.as_slice()) {
        let old_name = old.display(cache).to_string();
        let new_name = new.display(cache).to_string();
        cache.insert(&old_name, &new_name);
        stats.substitutions_recorded += 1;
    }

    log::debug!(
        "artist list replaced: {:?} -> {:?}",
        group_label(current, cache),
        group_label(&replacement, cache)
    );
    charts[target.0].entries_mut()[target.1].artists = replacement;
    stats.artist_list_replacements += 1;
}

/// Copy each first-chart video onto entries elsewhere with the same title.
fn propagate_videos(charts: &mut [Chart], stats: &mut NormalizationStats) {
    let Some((authority, rest)) = charts.split_first_mut() else {
        return;
    };

    for entry in rest.iter_mut().flat_map(|chart| chart.entries_mut().iter_mut()) {
        let mut matched = false;
        for source in authority.entries() {
            if source.title == entry.title {
                entry.video = source.video.clone();
                matched = true;
            }
        }
        if matched {
            stats.videos_propagated += 1;
        }
    }
}

// ============================================================================
// Normalized chart collection
// ============================================================================

/// Ordered charts kept normalized: every push, insert or replace re-runs the
/// engine. The collection owns its substitution cache, so cache entries
/// persist across re-runs of this collection and nowhere else.
#[derive(Debug)]
pub struct NormalizedCharts {
    engine: NormalizationEngine,
    charts: Vec<Chart>,
    cache: SubstitutionCache,
    stats: NormalizationStats,
}

impl NormalizedCharts {
    pub fn new(charts: Vec<Chart>) -> Self {
        Self::with_cache(charts, SubstitutionCache::new())
    }

    /// Start from a pre-seeded cache.
    pub fn with_cache(charts: Vec<Chart>, cache: SubstitutionCache) -> Self {
        Self::with_engine(NormalizationEngine::new(), charts, cache)
    }

    pub fn with_engine(engine: NormalizationEngine, charts: Vec<Chart>, cache: SubstitutionCache) -> Self {
        let mut normalized = Self {
            engine,
            charts,
            cache,
            stats: NormalizationStats::default(),
        };
        normalized.renormalize();
        normalized
    }

    /// Run the engine again over the current charts.
    pub fn renormalize(&mut self) -> &NormalizationStats {
        self.stats = self.engine.normalize(&mut self.charts, &mut self.cache);
        &self.stats
    }

    pub fn push(&mut self, chart: Chart) {
        self.charts.push(chart);
        self.renormalize();
    }

    /// Insert at `index`; panics if `index > len`, like `Vec::insert`.
    pub fn insert(&mut self, index: usize, chart: Chart) {
        self.charts.insert(index, chart);
        self.renormalize();
    }

    /// Swap the chart at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, chart: Chart) -> Chart {
        let old = std::mem::replace(&mut self.charts[index], chart);
        self.renormalize();
        old
    }

    /// Remove the chart at `index`. Remaining charts are left as they are.
    pub fn remove(&mut self, index: usize) -> Chart {
        self.charts.remove(index)
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    pub fn get(&self, index: usize) -> Option<&Chart> {
        self.charts.get(index)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chart> {
        self.charts.iter()
    }

    pub fn cache(&self) -> &SubstitutionCache {
        &self.cache
    }

    /// Stats of the most recent pass.
    pub fn stats(&self) -> &NormalizationStats {
        &self.stats
    }
}

impl std::ops::Index<usize> for NormalizedCharts {
    type Output = Chart;

    fn index(&self, index: usize) -> &Chart {
        &self.charts[index]
    }
}

impl<'a> IntoIterator for &'a NormalizedCharts {
    type Item = &'a Chart;
    type IntoIter = std::slice::Iter<'a, Chart>;

    fn into_iter(self) -> Self::IntoIter {
        self.charts.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
