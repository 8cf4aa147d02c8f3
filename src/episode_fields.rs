use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::episode_section::EpisodeSection;
use crate::pad_error::PadError;
use crate::pad_links::first_http_token;
use crate::pad_sections::PadSections;

pub const SHOWNOTES_HEADER: &str = "**Shownotes:**\n";

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ChapterMark {
    pub start: String,
    pub title: String,
}

impl ChapterMark {
    /// `00:01:23.000 Intro music` -> start `00:01:23.000`, title `Intro music`.
    pub fn from_line(line: &str) -> Option<Self> {
        line.split_once(' ').map(|(start, title)| Self {
            start: start.to_string(),
            title: title.to_string(),
        })
    }
}

pub fn short_summary(sections: &PadSections) -> Result<String, PadError> {
    sections
        .section(EpisodeSection::Summary)
        .map(|lines| lines.join("\n"))
        .ok_or(PadError::MissingSection(EpisodeSection::Summary))
}

/// Shownotes header followed by the `shownotes` lines, or `long summary` if
/// the pad has no shownotes.
pub fn long_summary(sections: &PadSections) -> Result<String, PadError> {
    let lines = sections
        .section(EpisodeSection::Shownotes)
        .or_else(|| sections.section(EpisodeSection::LongSummary));
    match lines {
        Some(lines) => Ok(format!("{}{}", SHOWNOTES_HEADER, lines.join("\n"))),
        None => {
            warn!("=== Found following Sections:");
            for (name, lines) in sections.iter() {
                warn!("=== {}: {}", name, lines.len());
            }
            Err(PadError::MissingSection(EpisodeSection::Shownotes))
        }
    }
}

pub fn chapters(sections: &PadSections) -> Vec<ChapterMark> {
    sections
        .section(EpisodeSection::Chapters)
        .unwrap_or_default()
        .iter()
        .filter_map(|line| ChapterMark::from_line(line))
        .collect()
}

/// Links of the music credits, one per `mukke` line that carries one.
pub fn music_links(sections: &PadSections) -> Vec<String> {
    let lines = match sections.section(EpisodeSection::Mukke) {
        Some(lines) => lines,
        None => {
            info!("no mukke Section in Pad");
            return Vec::new();
        }
    };
    lines
        .iter()
        .filter_map(|line| match first_http_token(line) {
            Some(link) => Some(link.to_string()),
            None => {
                warn!("no link found in mukke entry: {}", line);
                None
            }
        })
        .collect()
}

/// Markdown line appended to the long summary for one music credit.
pub fn music_credit(title: &str, link: &str) -> String {
    format!("\n&#x1f3b6;&nbsp;[{}]({})", title, link)
}
