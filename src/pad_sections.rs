use std::collections::HashMap;
use std::mem;

use crate::episode_section::EpisodeSection;

/// Key for lines that appear before the first `## ` heading.
pub const PRE_SECTION: &str = "pre-section";

/// Lines of a pad grouped by their second level heading.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PadSections(HashMap<String, Vec<String>>);

impl PadSections {
    pub fn parse(text: &str) -> Self {
        let mut splitter = SectionSplitter::new();
        for line in text.lines() {
            splitter.push_line(line);
        }
        splitter.finish()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn section(&self, section: EpisodeSection) -> Option<&[String]> {
        self.get(section.key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Splits a pad fed one line at a time. A repeated heading replaces the lines
/// committed under the earlier one.
#[derive(Debug)]
pub struct SectionSplitter {
    sections: HashMap<String, Vec<String>>,
    current_section: String,
    current_lines: Vec<String>,
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSplitter {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
            current_section: PRE_SECTION.to_string(),
            current_lines: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if let Some(heading) = line.strip_prefix("## ") {
            let previous = mem::replace(&mut self.current_section, heading.to_lowercase());
            self.sections
                .insert(previous, mem::take(&mut self.current_lines));
        } else if !line.starts_with('#') {
            self.current_lines.push(line.trim_matches(' ').to_string());
        }
    }

    pub fn finish(mut self) -> PadSections {
        self.sections
            .insert(self.current_section, self.current_lines);
        PadSections(self.sections)
    }
}
