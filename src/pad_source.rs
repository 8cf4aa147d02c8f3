use async_trait::async_trait;

use crate::pad_error::PadError;
use crate::pad_sections::PadSections;

/// Where pads and linked pages come from.
#[async_trait]
pub trait PadSource {
    /// First link below `prefix` in the index pad, if any.
    async fn first_link(&self, index_url: &str, prefix: &str) -> Result<Option<String>, PadError>;

    async fn pad_sections(&self, pad_url: &str) -> Result<PadSections, PadError>;

    /// Title of an html page, or the url itself when the page has no title line.
    async fn page_title(&self, url: &str) -> Result<String, PadError>;
}
