use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::Section;

pub const SECTION_COUNT: usize = 4;

static FENCED_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?i:json)\s*(.*?)\s*```").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("expected 4 sections, recovered {found}")]
    InsufficientSections { found: usize },
    #[error("malformed JSON candidate: {0}")]
    MalformedJson(String),
}

type Strategy = fn(&str) -> Option<Vec<Section>>;

/// Tried in order over the raw text; the first one that yields sections wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("json", from_json),
    ("markdown_headings", from_markdown_headings),
];

/// Recover exactly four sections from raw model output.
pub fn extract(raw: &str) -> Result<[Section; SECTION_COUNT], ExtractError> {
    let sections = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let found = strategy(raw)?;
            debug!(strategy = name, sections = found.len(), "extraction strategy matched");
            Some(found)
        })
        .unwrap_or_default();

    take_four(sections)
}

fn take_four(mut sections: Vec<Section>) -> Result<[Section; SECTION_COUNT], ExtractError> {
    let found = sections.len();
    if found < SECTION_COUNT {
        return Err(ExtractError::InsufficientSections { found });
    }
    sections.truncate(SECTION_COUNT);
    <[Section; SECTION_COUNT]>::try_from(sections)
        .map_err(|v| ExtractError::InsufficientSections { found: v.len() })
}

// ── JSON strategy ──

/// Fenced block → balanced object → shape interpretation. The object scan
/// runs first; a balanced array is only tried when it recognizes nothing.
pub fn from_json(raw: &str) -> Option<Vec<Section>> {
    let candidate = fenced_json(raw).unwrap_or(raw);
    [balanced_json(candidate), balanced_array(candidate)]
        .into_iter()
        .flatten()
        .find_map(|json| match interpret_json(json) {
            Ok(sections) => sections,
            Err(err) => {
                debug!(error = %err, "JSON candidate rejected");
                None
            }
        })
}

/// Interior of the first ```` ```json ```` fenced block.
pub fn fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The first balanced JSON object in `text`. Braces inside string literals
/// are not counted.
pub fn balanced_json(text: &str) -> Option<&str> {
    balanced(text, b'{', b'}')
}

/// The first balanced `[ ... ]` run in `text`.
pub fn balanced_array(text: &str) -> Option<&str> {
    balanced(text, b'[', b']')
}

fn balanced(text: &str, open: u8, close: u8) -> Option<&str> {
    let start = text.bytes().position(|b| b == open)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, b) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match *b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match *b {
            b'"' => in_string = true,
            b if b == open => depth += 1,
            b if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Deserialize)]
struct KeyedSections {
    section1_title: String,
    section1_content: String,
    section2_title: String,
    section2_content: String,
    section3_title: String,
    section3_content: String,
    section4_title: String,
    section4_content: String,
}

impl KeyedSections {
    fn into_sections(self) -> Option<Vec<Section>> {
        let pairs = [
            (self.section1_title, self.section1_content),
            (self.section2_title, self.section2_content),
            (self.section3_title, self.section3_content),
            (self.section4_title, self.section4_content),
        ];
        if pairs.iter().any(|(t, c)| t.trim().is_empty() || c.trim().is_empty()) {
            return None;
        }
        Some(pairs.into_iter().map(|(t, c)| Section::new(t, c)).collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SectionPayload {
    Keyed(KeyedSections),
    Wrapped { sections: Vec<Section> },
    List(Vec<Section>),
}

/// Parse a JSON candidate. `Ok(None)` means valid JSON of an unknown shape.
pub fn interpret_json(candidate: &str) -> Result<Option<Vec<Section>>, ExtractError> {
    let value: serde_json::Value = serde_json::from_str(candidate)
        .map_err(|e| ExtractError::MalformedJson(e.to_string()))?;

    match serde_json::from_value::<SectionPayload>(value) {
        Ok(SectionPayload::Keyed(keyed)) => Ok(keyed.into_sections()),
        Ok(SectionPayload::Wrapped { sections }) | Ok(SectionPayload::List(sections)) => {
            Ok(Some(sections))
        }
        Err(err) => {
            debug!(error = %err, "JSON does not match a section shape");
            Ok(None)
        }
    }
}

// ── Markdown strategy ──

/// Sections opened by `#` / `##` heading lines over the whole raw text.
pub fn from_markdown_headings(raw: &str) -> Option<Vec<Section>> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in raw.lines() {
        let line = line.trim();
        if let Some(title) = section_heading(line) {
            sections.extend(current.take());
            current = Some(Section::new(title, String::new()));
        } else if let Some(section) = current.as_mut() {
            if line.is_empty() {
                continue;
            }
            if !section.content.is_empty() {
                section.content.push('\n');
            }
            section.content.push_str(line);
        }
    }
    sections.extend(current);

    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

fn section_heading(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let hashes = line.len() - rest.len();
    if (1..=2).contains(&hashes) {
        Some(rest.trim())
    } else {
        None
    }
}

// ── Tests ──
