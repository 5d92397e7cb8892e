pub mod chunks;
pub mod extract;
pub mod html;
pub mod lines;

use serde::{Deserialize, Deserializer, Serialize};

use chunks::Chunk;
use extract::ExtractError;

/// One titled block of a pitch. Position in the pitch is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Section {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Title without leading `#`..`######` heading markers.
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        let hashes = title.len() - title.trim_start_matches('#').len();
        if (1..=6).contains(&hashes) {
            title[hashes..].trim_start()
        } else {
            title
        }
    }
}

// Models sometimes emit `content` as a list of paragraphs instead of one string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentField {
    Text(String),
    Paragraphs(Vec<String>),
}

#[derive(Deserialize)]
struct RawSection {
    title: String,
    content: ContentField,
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawSection::deserialize(deserializer)?;
        let content = match raw.content {
            ContentField::Text(text) => text,
            ContentField::Paragraphs(parts) => parts.join("\n\n"),
        };
        Ok(Section::new(raw.title, content))
    }
}

/// A section plus both renderings of its content.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    pub title: String,
    pub display_title: String,
    pub content: String,
    pub html: String,
    pub chunks: Vec<Chunk>,
}

impl From<&Section> for RenderedSection {
    fn from(section: &Section) -> Self {
        RenderedSection {
            title: section.title.clone(),
            display_title: section.display_title().to_string(),
            content: section.content.clone(),
            html: html::to_display_html(&section.content),
            chunks: chunks::chunk_content(&section.content),
        }
    }
}

/// Two-pass pipeline: raw model text → four sections → rendered sections.
pub fn process_response(raw: &str) -> Result<Vec<RenderedSection>, ExtractError> {
    let sections = extract::extract(raw)?;
    Ok(render_sections(&sections))
}

pub fn render_sections(sections: &[Section]) -> Vec<RenderedSection> {
    sections.iter().map(RenderedSection::from).collect()
}

// ── Tests ──
