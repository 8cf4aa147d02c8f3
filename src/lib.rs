pub mod config;
pub mod episode;
pub mod episode_fields;
pub mod episode_section;
pub mod pad_connection;
pub mod pad_error;
pub mod pad_links;
pub mod pad_sections;
pub mod pad_source;
pub mod padcatch_opts;

pub use episode::{AudioRef, EpisodeDate, EpisodeRecord};
pub use episode_fields::ChapterMark;
pub use pad_error::{ErrorKind, PadError};
pub use pad_sections::PadSections;
pub use pad_source::PadSource;
