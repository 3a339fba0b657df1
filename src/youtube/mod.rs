use crate::model::Privacy;
use async_trait::async_trait;
use thiserror::Error;

pub mod api;
pub mod auth;

pub use api::DataApi;

/// Provider-level failure from the video platform. Recoverable per track
/// during population (the track is recorded as missing); fatal when raised
/// by playlist creation.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode API response: {0}")]
    Decode(String),
}

/// The narrow surface of the video platform the pipeline relies on. The
/// production implementation is [`DataApi`]; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait VideoPlatform {
    /// Searches for a video and returns the top-ranked result's id, or
    /// `None` when the result set is empty.
    async fn search_video(&self, query: &str) -> Result<Option<String>, PlatformError>;

    /// Creates a playlist and returns its id.
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<String, PlatformError>;

    /// Appends a video to an existing playlist.
    async fn append_to_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlatformError>;
}
