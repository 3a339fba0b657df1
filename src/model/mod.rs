use std::fmt;
use std::str::FromStr;

/// One (title, artist) pair from the ranked singles listing. Chart position
/// is implicit in the order entries are produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartEntry {
    pub title: String,
    pub artist: String,
}

impl ChartEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for ChartEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} - {}", self.artist, self.title)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Privacy {
    Private,
    Unlisted,
    Public,
}

impl Privacy {
    /// The spelling the playlist API expects in `status.privacyStatus`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Unlisted => "unlisted",
            Self::Public => "public",
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("unknown privacy status: {0}")]
pub struct PrivacyParseError(String);

impl FromStr for Privacy {
    type Err = PrivacyParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "private" => Ok(Self::Private),
            "unlisted" => Ok(Self::Unlisted),
            "public" => Ok(Self::Public),
            other => Err(PrivacyParseError(other.to_owned())),
        }
    }
}
