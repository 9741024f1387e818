//! Video lookup for entries a source did not link.
//!
//! The search service itself is external; [`VideoResolver`] only applies the
//! selection rule to what a [`VideoSearch`] returns.

use crate::cache::SubstitutionCache;
use crate::chart::Chart;
use crate::error::VideoLookupError;
use crate::scoring::{similarity_ratio, VIDEO_TITLE_THRESHOLD};

/// Channels above this subscriber count are trusted regardless of title.
pub const TRUSTED_CHANNEL_SUBSCRIBERS: u64 = 100_000;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub channel_subscribers: u64,
}

/// Text search over a video service, best match first.
pub trait VideoSearch {
    fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, VideoLookupError>;
}

pub struct VideoResolver<S> {
    search: S,
}

impl<S: VideoSearch> VideoResolver<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }

    /// URL for the top search hit if it passes the selection rule.
    pub fn resolve(&self, query: &str) -> Result<Option<String>, VideoLookupError> {
        let candidates = self.search.search(query)?;
        Ok(candidates
            .first()
            .filter(|candidate| accept_candidate(query, candidate))
            .map(|candidate| video_url(&candidate.video_id)))
    }
}

/// Accept when the title is close to the query, or when a large channel
/// posted it and it is not a teaser.
pub fn accept_candidate(query: &str, candidate: &VideoCandidate) -> bool {
    if similarity_ratio(query, &candidate.title) > VIDEO_TITLE_THRESHOLD {
        return true;
    }

    candidate.channel_subscribers > TRUSTED_CHANNEL_SUBSCRIBERS
        && !candidate.title.to_lowercase().contains("teaser")
}

pub fn video_url(video_id: &str) -> String {
    format!("https://youtu.be/{}", video_id)
}

/// Fill in every empty video link in `chart` by searching for
/// "<artists> - <title>". Lookup failures leave the entry unset.
/// Returns how many entries were filled.
pub fn annotate_missing_videos<S: VideoSearch>(
    chart: &mut Chart,
    resolver: &VideoResolver<S>,
    cache: &SubstitutionCache,
) -> usize {
    let mut filled = 0;

    for entry in chart.entries_mut().iter_mut().filter(|entry| !entry.has_video()) {
        let query = entry.display_name(cache);
        match resolver.resolve(&query) {
            Ok(Some(url)) => {
                entry.video = url;
                filled += 1;
            }
            Ok(None) => log::debug!("no video accepted for {:?}", query),
            Err(err) => log::warn!("video lookup failed for {:?}: {}", query, err),
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artist::ArtistIdentity;
    use crate::chart::ChartSource;
    use crate::models::{ChartEntry, Rank};
    use rustc_hash::FxHashMap;

    struct FakeSearch(FxHashMap<String, Vec<VideoCandidate>>);

    impl VideoSearch for FakeSearch {
        fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, VideoLookupError> {
            self.0
                .get(query)
                .cloned()
                .ok_or_else(|| VideoLookupError::Search(format!("quota exceeded for {}", query)))
        }
    }

    struct NoKey;

    impl VideoSearch for NoKey {
        fn search(&self, _query: &str) -> Result<Vec<VideoCandidate>, VideoLookupError> {
            Err(VideoLookupError::MissingApiKey)
        }
    }

    fn candidate(id: &str, title: &str, subscribers: u64) -> VideoCandidate {
        VideoCandidate {
            video_id: id.to_string(),
            title: title.to_string(),
            channel_subscribers: subscribers,
        }
    }

    #[test]
    fn test_accept_similar_title() {
        let unrelated = candidate("abc", "Lofi beats to study to", 10);
        assert!(!accept_candidate("BIGBANG - Fantastic Baby", &unrelated));

        let close = candidate("abc", "BIGBANG - Fantastic Baby MV", 10);
        assert!(accept_candidate("BIGBANG - Fantastic Baby", &close));
    }

    #[test]
    fn test_accept_trusted_channel_unless_teaser() {
        let official = candidate("abc", "[MV] 빅뱅", 5_000_000);
        assert!(accept_candidate("BIGBANG - Fantastic Baby", &official));

        let teaser = candidate("abc", "[Teaser] 빅뱅", 5_000_000);
        assert!(!accept_candidate("BIGBANG - Fantastic Baby", &teaser));

        let small = candidate("abc", "[MV] 빅뱅", 100_000);
        assert!(!accept_candidate("BIGBANG - Fantastic Baby", &small));
    }

    #[test]
    fn test_resolver_only_considers_top_hit() {
        let mut results = FxHashMap::default();
        results.insert(
            "IU - Good Day".to_string(),
            vec![candidate("x", "unrelated", 1), candidate("y", "IU - Good Day", 1)],
        );
        let resolver = VideoResolver::new(FakeSearch(results));

        assert_eq!(resolver.resolve("IU - Good Day").unwrap(), None);
    }

    #[test]
    fn test_resolver_missing_key() {
        let resolver = VideoResolver::new(NoKey);
        assert!(matches!(
            resolver.resolve("IU - Good Day"),
            Err(VideoLookupError::MissingApiKey)
        ));
    }

    #[test]
    fn test_annotate_missing_videos() {
        let mut results = FxHashMap::default();
        results.insert(
            "IU - Good Day".to_string(),
            vec![candidate("gd", "IU - Good Day", 1)],
        );
        let resolver = VideoResolver::new(FakeSearch(results));

        let mut chart = Chart::from_entries(
            ChartSource::IChart,
            None,
            10,
            vec![
                ChartEntry::new(Rank::Position(1), vec![ArtistIdentity::new("아이유")], "Good Day"),
                ChartEntry::new(Rank::Position(2), vec![ArtistIdentity::new("EXO")], "Growl")
                    .with_video("https://youtu.be/growl"),
                ChartEntry::new(Rank::Position(3), vec![ArtistIdentity::new("Unknown")], "Missing"),
            ],
        )
        .unwrap();
        let cache: SubstitutionCache = [("아이유", "IU")].into_iter().collect();

        let filled = annotate_missing_videos(&mut chart, &resolver, &cache);

        assert_eq!(filled, 1);
        assert_eq!(chart.entries()[0].video, "https://youtu.be/gd");
        assert_eq!(chart.entries()[1].video, "https://youtu.be/growl");
        assert!(!chart.entries()[2].has_video());
    }
}
