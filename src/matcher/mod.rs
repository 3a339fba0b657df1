use crate::model::ChartEntry;
use crate::youtube::{PlatformError, VideoPlatform};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Found(String),
    NotFound,
}

/// Resolves a chart entry to its best-effort video match: one search, top
/// result wins. Identical entries re-issue the search; nothing is cached.
pub struct TrackMatcher<'a, P: VideoPlatform> {
    platform: &'a P,
}

impl<'a, P: VideoPlatform> TrackMatcher<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    pub async fn resolve(&self, entry: &ChartEntry) -> Result<MatchResult, PlatformError> {
        let result = self
            .platform
            .search_video(&search_query(entry))
            .await?
            .map_or(MatchResult::NotFound, MatchResult::Found);

        Ok(result)
    }
}

/// The fixed search template; quoting the title keeps covers and reaction
/// videos out of the top slot more often than a bare concatenation.
pub fn search_query(entry: &ChartEntry) -> String {
    format!("{} \"{}\" official audio", entry.artist, entry.title)
}
