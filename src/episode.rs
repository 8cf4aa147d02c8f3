use log::info;
use serde::{Deserialize, Serialize};

use crate::episode_fields::{chapters, long_summary, music_credit, music_links, short_summary, ChapterMark};
use crate::pad_error::PadError;
use crate::pad_sections::PadSections;
use crate::pad_source::PadSource;

pub const SUBTITLE: &str = "Der Chaostreff im Freien Radio Potsdam";
pub const AUDIO_MIME_TYPE: &str = "audio/mp3";
/// Substituted with the real media host when the feed is rendered.
pub const MEDIA_BASE_URL: &str = "$media_base_url";

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct AudioRef {
    pub url: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub uuid: String,
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    #[serde(rename = "publicationDate")]
    pub publication_date: String,
    pub audio: AudioRef,
    pub chapters: Vec<ChapterMark>,
    pub long_summary_md: String,
}

/// Broadcast date carried in a pad url such as `.../CiR_2023-05-10_thema`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeDate {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl EpisodeDate {
    pub fn from_pad_url(pad_url: &str) -> Result<Self, PadError> {
        let malformed = || PadError::MalformedEpisodeUrl(pad_url.to_string());
        let entry_date = pad_url.split('_').nth(1).ok_or_else(malformed)?;
        if entry_date.len() < 10 {
            return Err(malformed());
        }
        info!("entrydate={}", entry_date);

        let slice = |range: std::ops::Range<usize>| {
            entry_date
                .get(range)
                .map(ToString::to_string)
                .ok_or_else(malformed)
        };
        Ok(Self {
            year: slice(0..4)?,
            month: slice(5..7)?,
            day: slice(8..10)?,
        })
    }

    pub fn uuid(&self) -> String {
        format!("nt-{}-{}-{}", self.year, self.month, self.day)
    }

    pub fn title(&self) -> String {
        format!("CiR am {}.{}.{}", self.day, self.month, self.year)
    }

    pub fn publication_date(&self) -> String {
        format!("{}-{}-{}T00:00:00+02:00", self.year, self.month, self.day)
    }

    pub fn audio_url(&self) -> String {
        format!(
            "{}/{}_{}_{}-chaos-im-radio.mp3",
            MEDIA_BASE_URL, self.year, self.month, self.day
        )
    }
}

impl EpisodeRecord {
    /// Build the feed entry for the pad at `pad_url`. Music credit titles are
    /// looked up through `source`.
    pub async fn assemble<S>(
        pad_url: &str,
        sections: &PadSections,
        source: &S,
    ) -> Result<Self, PadError>
    where
        S: PadSource + Sync + ?Sized,
    {
        let date = EpisodeDate::from_pad_url(pad_url)?;
        let mut long_summary_md = long_summary(sections)?;
        let summary = short_summary(sections)?;

        for link in music_links(sections) {
            let title = source.page_title(&link).await?;
            long_summary_md.push_str(&music_credit(&title, &link));
        }

        Ok(Self {
            uuid: date.uuid(),
            title: date.title(),
            subtitle: SUBTITLE.to_string(),
            summary,
            publication_date: date.publication_date(),
            audio: AudioRef {
                url: date.audio_url(),
                mime_type: AUDIO_MIME_TYPE.to_string(),
            },
            chapters: chapters(sections),
            long_summary_md,
        })
    }

    pub fn to_yaml(&self) -> Result<String, PadError> {
        serde_yaml::to_string(self).map_err(Into::into)
    }
}
