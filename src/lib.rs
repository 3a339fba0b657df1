pub mod chart;
pub mod config;
pub mod matcher;
pub mod model;
pub mod playlist;
pub mod youtube;

use config::Config;
use playlist::PopulateOutcome;

/// Runs the whole pipeline: scrape the singles chart for the configured
/// date, authorize against the video platform, then create and populate the
/// playlist. Whole-run failures (fetch, auth, playlist creation) abort here;
/// per-track failures come back in the outcome's missing list.
pub async fn run(config: Config) -> anyhow::Result<PopulateOutcome> {
    let http_client = reqwest::Client::new();

    let extractor = chart::Extractor::new(http_client.clone(), &config.user_agent);
    let tracks = extractor.fetch(&config.date).await?;
    if tracks.is_empty() {
        tracing::warn!(date = %config.date, "chart page yielded no entries");
    }

    let access_token = youtube::auth::authorize(&http_client, &config.client_secret_file).await?;
    let platform = youtube::DataApi::new(http_client, access_token);

    let outcome = playlist::Builder::new(platform)
        .populate(&config.playlist, &tracks)
        .await?;

    Ok(outcome)
}
