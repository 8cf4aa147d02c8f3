use anyhow::{format_err, Error};
use std::fmt;
use std::str::FromStr;

/// Sections of an episode pad that feed the episode record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EpisodeSection {
    Summary,
    Shownotes,
    LongSummary,
    Chapters,
    Mukke,
}

impl EpisodeSection {
    /// Section key as produced by the splitter (lower case heading text).
    pub fn key(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Shownotes => "shownotes",
            Self::LongSummary => "long summary",
            Self::Chapters => "chapters",
            Self::Mukke => "mukke",
        }
    }
}

impl fmt::Display for EpisodeSection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for EpisodeSection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "shownotes" => Ok(Self::Shownotes),
            "long summary" => Ok(Self::LongSummary),
            "chapters" => Ok(Self::Chapters),
            "mukke" => Ok(Self::Mukke),
            _ => Err(format_err!("Invalid section {}", s)),
        }
    }
}
