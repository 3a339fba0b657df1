use crate::model::{Privacy, PrivacyParseError};
use crate::playlist::PlaylistSpec;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DATE_VAR: &str = "CHART_DATE";
const TITLE_VAR: &str = "PLAYLIST_TITLE";
const DESCRIPTION_VAR: &str = "PLAYLIST_DESCRIPTION";
const PRIVACY_VAR: &str = "PLAYLIST_PRIVACY";
const CLIENT_SECRET_FILE_VAR: &str = "CLIENT_SECRET_FILE";
const USER_AGENT_VAR: &str = "CHART_USER_AGENT";

const DEFAULT_DESCRIPTION: &str = "Auto-generated from extracted chart HTML.";
const DEFAULT_CLIENT_SECRET_FILE: &str = "client_secret.json";

// The chart host rejects requests without a browser-looking User-Agent.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.0.1 Safari/605.1.15";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error(transparent)]
    Privacy(#[from] PrivacyParseError),
}

pub struct Config {
    pub date: String,
    pub user_agent: String,
    pub client_secret_file: PathBuf,
    pub playlist: PlaylistSpec,
}

impl Config {
    /// Reads the run configuration from the environment. Only the chart
    /// date is mandatory; everything else has a default derived from it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let date = env::var(DATE_VAR).map_err(|_| ConfigError::Missing(DATE_VAR))?;

        let title =
            env::var(TITLE_VAR).unwrap_or_else(|_| format!("Singles Chart {}", date));
        let description =
            env::var(DESCRIPTION_VAR).unwrap_or_else(|_| DEFAULT_DESCRIPTION.to_owned());
        let privacy = match env::var(PRIVACY_VAR) {
            Ok(value) => value.parse()?,
            Err(_) => Privacy::Unlisted,
        };

        Ok(Self {
            date,
            user_agent: env::var(USER_AGENT_VAR).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_owned()),
            client_secret_file: env::var(CLIENT_SECRET_FILE_VAR)
                .unwrap_or_else(|_| DEFAULT_CLIENT_SECRET_FILE.to_owned())
                .into(),
            playlist: PlaylistSpec {
                title,
                description,
                privacy,
            },
        })
    }
}
