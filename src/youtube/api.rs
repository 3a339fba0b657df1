use crate::model::Privacy;
use crate::youtube::{PlatformError, VideoPlatform};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Deserialize)]
struct PlaylistResponse {
    id: String,
}

/// YouTube Data API v3 client authorized by a bearer token obtained from
/// the OAuth flow in [`crate::youtube::auth`].
pub struct DataApi {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DataApi {
    pub fn new(http_client: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            access_token: access_token.into(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(PlatformError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl VideoPlatform for DataApi {
    async fn search_video(&self, query: &str) -> Result<Option<String>, PlatformError> {
        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[
                ("part", "id"),
                ("q", query),
                ("type", "video"),
                ("maxResults", "1"),
                ("safeSearch", "none"),
            ])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let search: SearchResponse = response
            .json()
            .await
            .map_err(|error| PlatformError::Decode(error.to_string()))?;

        Ok(search.items.into_iter().next().map(|item| item.id.video_id))
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<String, PlatformError> {
        let response = self
            .http_client
            .post(format!("{}/playlists", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet,status")])
            .json(&json!({
                "snippet": { "title": title, "description": description },
                "status": { "privacyStatus": privacy.as_str() },
            }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let playlist: PlaylistResponse = response
            .json()
            .await
            .map_err(|error| PlatformError::Decode(error.to_string()))?;

        Ok(playlist.id)
    }

    async fn append_to_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlatformError> {
        let response = self
            .http_client
            .post(format!("{}/playlistItems", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&json!({
                "snippet": {
                    "playlistId": playlist_id,
                    "resourceId": { "kind": "youtube#video", "videoId": video_id },
                },
            }))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
