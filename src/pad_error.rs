use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::episode_section::EpisodeSection;

/// Coarse classification of a failure, used for the final diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Content,
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Network => "network",
            Self::Content => "content",
            Self::Output => "output",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum PadError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} must be accessible, got status {status}")]
    Status { url: String, status: StatusCode },

    #[error("no {0} Section in Pad")]
    MissingSection(EpisodeSection),

    #[error("pad url must contain a date in the format YYYY-MM-DD_: {0}")]
    MalformedEpisodeUrl(String),

    #[error("pad url must start with {prefix}: {url}")]
    ForeignPadUrl { url: String, prefix: String },

    #[error("no episode link found in {0}")]
    NoEpisodeLink(String),

    #[error("failed to serialize episode: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("error writing {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => ErrorKind::Network,
            Self::MissingSection(_)
            | Self::MalformedEpisodeUrl(_)
            | Self::ForeignPadUrl { .. }
            | Self::NoEpisodeLink(_) => ErrorKind::Content,
            Self::Yaml(_) | Self::Output { .. } => ErrorKind::Output,
        }
    }
}
