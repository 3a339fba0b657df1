use crate::matcher::{MatchResult, TrackMatcher};
use crate::model::{ChartEntry, Privacy};
use crate::youtube::{PlatformError, VideoPlatform};
use std::time::Duration;
use thiserror::Error;

// Fixed pause after each successful append, to stay under the platform's
// rate limits. Misses do not consume quota the same way and get no pause.
const APPEND_PAUSE: Duration = Duration::from_millis(100);

const MISSING_PREVIEW_COUNT: usize = 10;

#[derive(Error, Debug)]
#[error("creating the playlist failed: {0}")]
pub struct CreationError(#[from] pub PlatformError);

#[derive(Clone, Debug)]
pub struct PlaylistSpec {
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
}

/// Result of one populate run: the created playlist and the entries that
/// never made it in, in their original chart order.
#[derive(Debug)]
pub struct PopulateOutcome {
    pub playlist_id: String,
    pub appended: usize,
    pub missing: Vec<ChartEntry>,
}

enum TrackOutcome {
    Appended(String),
    Missed(MissReason),
}

enum MissReason {
    NoMatch,
    Search(PlatformError),
    Append(PlatformError),
}

/// Creates a playlist and fills it from an ordered track list, one track at
/// a time. A failed creation aborts the run; a failed track is recorded as
/// missing and the batch carries on.
pub struct Builder<P: VideoPlatform> {
    platform: P,
    append_pause: Duration,
}

impl<P: VideoPlatform> Builder<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            append_pause: APPEND_PAUSE,
        }
    }

    pub fn with_append_pause(mut self, append_pause: Duration) -> Self {
        self.append_pause = append_pause;
        self
    }

    /// Populates a fresh playlist from `tracks`, strictly in input order.
    /// Every track ends up either appended or in `missing`; re-running with
    /// the same inputs creates a second playlist and appends again, there is
    /// no idempotence.
    pub async fn populate(
        &self,
        spec: &PlaylistSpec,
        tracks: &[ChartEntry],
    ) -> Result<PopulateOutcome, CreationError> {
        let playlist_id = self
            .platform
            .create_playlist(&spec.title, &spec.description, spec.privacy)
            .await?;
        tracing::info!(playlist_id = %playlist_id, title = %spec.title, "created playlist");

        let matcher = TrackMatcher::new(&self.platform);
        let mut appended = 0_usize;
        let mut missing = Vec::new();

        for entry in tracks {
            match self.process_track(&matcher, &playlist_id, entry).await {
                TrackOutcome::Appended(video_id) => {
                    appended += 1;
                    tracing::info!(track = %entry, video_id = %video_id, "added");
                    tokio::time::sleep(self.append_pause).await;
                }
                TrackOutcome::Missed(reason) => {
                    match reason {
                        MissReason::NoMatch => tracing::warn!(track = %entry, "no match"),
                        MissReason::Search(error) => {
                            tracing::warn!(track = %entry, error = %error, "search failed")
                        }
                        MissReason::Append(error) => {
                            tracing::warn!(track = %entry, error = %error, "append failed")
                        }
                    }
                    missing.push(entry.clone());
                }
            }
        }

        tracing::info!(appended, missing = missing.len(), "playlist populated");
        for entry in missing.iter().take(MISSING_PREVIEW_COUNT) {
            tracing::warn!(track = %entry, "missing");
        }

        Ok(PopulateOutcome {
            playlist_id,
            appended,
            missing,
        })
    }

    async fn process_track(
        &self,
        matcher: &TrackMatcher<'_, P>,
        playlist_id: &str,
        entry: &ChartEntry,
    ) -> TrackOutcome {
        let video_id = match matcher.resolve(entry).await {
            Ok(MatchResult::Found(video_id)) => video_id,
            Ok(MatchResult::NotFound) => return TrackOutcome::Missed(MissReason::NoMatch),
            Err(error) => return TrackOutcome::Missed(MissReason::Search(error)),
        };

        match self.platform.append_to_playlist(playlist_id, &video_id).await {
            Ok(()) => TrackOutcome::Appended(video_id),
            Err(error) => TrackOutcome::Missed(MissReason::Append(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone)]
    enum SearchScript {
        Hit(&'static str),
        Empty,
        Fail,
    }

    struct FakePlatform {
        fail_create: bool,
        // Keyed by track title; looked up by substring of the search query.
        searches: HashMap<&'static str, SearchScript>,
        failing_appends: Vec<&'static str>,
        appends: Mutex<Vec<(String, String)>>,
        created: Mutex<usize>,
    }

    impl FakePlatform {
        fn new(searches: Vec<(&'static str, SearchScript)>) -> Self {
            Self {
                fail_create: false,
                searches: searches.into_iter().collect(),
                failing_appends: Vec::new(),
                appends: Mutex::new(Vec::new()),
                created: Mutex::new(0),
            }
        }

        fn transient() -> PlatformError {
            PlatformError::Status {
                status: 403,
                message: "quotaExceeded".to_owned(),
            }
        }
    }

    #[async_trait]
    impl VideoPlatform for FakePlatform {
        async fn search_video(&self, query: &str) -> Result<Option<String>, PlatformError> {
            let script = self
                .searches
                .iter()
                .find(|(title, _)| query.contains(*title))
                .map(|(_, script)| script.clone())
                .unwrap_or(SearchScript::Empty);

            match script {
                SearchScript::Hit(video_id) => Ok(Some(video_id.to_owned())),
                SearchScript::Empty => Ok(None),
                SearchScript::Fail => Err(Self::transient()),
            }
        }

        async fn create_playlist(
            &self,
            _title: &str,
            _description: &str,
            _privacy: Privacy,
        ) -> Result<String, PlatformError> {
            if self.fail_create {
                return Err(Self::transient());
            }
            let mut created = self.created.lock().unwrap();
            *created += 1;
            Ok(format!("PL{}", created))
        }

        async fn append_to_playlist(
            &self,
            playlist_id: &str,
            video_id: &str,
        ) -> Result<(), PlatformError> {
            if self.failing_appends.contains(&video_id) {
                return Err(Self::transient());
            }
            self.appends
                .lock()
                .unwrap()
                .push((playlist_id.to_owned(), video_id.to_owned()));
            Ok(())
        }
    }

    fn spec() -> PlaylistSpec {
        PlaylistSpec {
            title: "Singles Chart 1978-02-04".to_owned(),
            description: "Auto-generated from extracted chart HTML.".to_owned(),
            privacy: Privacy::Unlisted,
        }
    }

    fn builder(platform: FakePlatform) -> Builder<FakePlatform> {
        Builder::new(platform).with_append_pause(Duration::ZERO)
    }

    #[tokio::test]
    async fn creation_failure_is_fatal_and_appends_nothing() {
        let mut platform = FakePlatform::new(vec![("Stayin' Alive", SearchScript::Hit("v1"))]);
        platform.fail_create = true;
        let builder = builder(platform);

        let result = builder
            .populate(&spec(), &[ChartEntry::new("Stayin' Alive", "Bee Gees")])
            .await;

        assert!(result.is_err());
        assert!(builder.platform.appends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_track_is_appended_or_missing() {
        let platform = FakePlatform::new(vec![
            ("Stayin' Alive", SearchScript::Hit("v1")),
            ("Short People", SearchScript::Empty),
            ("Baby Come Back", SearchScript::Hit("v2")),
        ]);
        let tracks = vec![
            ChartEntry::new("Stayin' Alive", "Bee Gees"),
            ChartEntry::new("Short People", "Randy Newman"),
            ChartEntry::new("Baby Come Back", "Player"),
        ];

        let outcome = builder(platform).populate(&spec(), &tracks).await.unwrap();

        assert_eq!(outcome.appended + outcome.missing.len(), tracks.len());
        assert_eq!(outcome.appended, 2);
        assert_eq!(
            outcome.missing,
            vec![ChartEntry::new("Short People", "Randy Newman")]
        );
    }

    #[tokio::test]
    async fn transient_search_error_does_not_abort_the_batch() {
        let platform = FakePlatform::new(vec![
            ("A", SearchScript::Hit("v1")),
            ("B", SearchScript::Fail),
            ("C", SearchScript::Empty),
            ("D", SearchScript::Hit("v2")),
        ]);
        let tracks = vec![
            ChartEntry::new("A", "a"),
            ChartEntry::new("B", "b"),
            ChartEntry::new("C", "c"),
            ChartEntry::new("D", "d"),
        ];

        let builder = builder(platform);
        let outcome = builder.populate(&spec(), &tracks).await.unwrap();

        // Misses keep input order; later tracks were still attempted.
        assert_eq!(
            outcome.missing,
            vec![ChartEntry::new("B", "b"), ChartEntry::new("C", "c")]
        );
        let appends = builder.platform.appends.lock().unwrap();
        assert_eq!(
            *appends,
            vec![
                ("PL1".to_owned(), "v1".to_owned()),
                ("PL1".to_owned(), "v2".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_append_counts_as_missing() {
        let mut platform = FakePlatform::new(vec![
            ("A", SearchScript::Hit("v1")),
            ("B", SearchScript::Hit("v2")),
        ]);
        platform.failing_appends = vec!["v1"];
        let tracks = vec![ChartEntry::new("A", "a"), ChartEntry::new("B", "b")];

        let builder = builder(platform);
        let outcome = builder.populate(&spec(), &tracks).await.unwrap();

        assert_eq!(outcome.appended, 1);
        assert_eq!(outcome.missing, vec![ChartEntry::new("A", "a")]);
        assert_eq!(
            *builder.platform.appends.lock().unwrap(),
            vec![("PL1".to_owned(), "v2".to_owned())]
        );
    }

    #[tokio::test]
    async fn unmatched_track_is_reported_and_matched_one_appended() {
        let platform = FakePlatform::new(vec![("Stayin' Alive", SearchScript::Hit("v1"))]);
        let tracks = vec![
            ChartEntry::new("Stayin' Alive", "Bee Gees"),
            ChartEntry::new("Unknown Song X", "Unknown Artist Y"),
        ];

        let builder = builder(platform);
        let outcome = builder.populate(&spec(), &tracks).await.unwrap();

        assert_eq!(
            outcome.missing,
            vec![ChartEntry::new("Unknown Song X", "Unknown Artist Y")]
        );
        assert_eq!(builder.platform.appends.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rerunning_populate_appends_duplicates() {
        let platform = FakePlatform::new(vec![("Stayin' Alive", SearchScript::Hit("v1"))]);
        let tracks = vec![ChartEntry::new("Stayin' Alive", "Bee Gees")];

        let builder = builder(platform);
        let first = builder.populate(&spec(), &tracks).await.unwrap();
        let second = builder.populate(&spec(), &tracks).await.unwrap();

        assert_ne!(first.playlist_id, second.playlist_id);
        // No idempotence: the same video is inserted once per run.
        let appends = builder.platform.appends.lock().unwrap();
        assert_eq!(appends.iter().filter(|(_, v)| v == "v1").count(), 2);
    }
}
