use dotenv::dotenv;
use replaylist::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let outcome = replaylist::run(config).await?;

    tracing::info!(
        playlist_id = %outcome.playlist_id,
        appended = outcome.appended,
        missing = outcome.missing.len(),
        "done"
    );

    Ok(())
}
