use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::lines::normalize_line_endings;

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:\d+\.|[-*+])\s").unwrap());

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Paragraph,
    List,
    Table,
    Blockquote,
    Codeblock,
}

/// A structurally whole piece of Markdown, revealed as one animation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    None,
    List,
    Table,
    Blockquote,
    Codeblock,
}

impl Mode {
    fn kind(self) -> Option<ChunkKind> {
        match self {
            Mode::None => None,
            Mode::List => Some(ChunkKind::List),
            Mode::Table => Some(ChunkKind::Table),
            Mode::Blockquote => Some(ChunkKind::Blockquote),
            Mode::Codeblock => Some(ChunkKind::Codeblock),
        }
    }
}

/// Split content into Markdown chunks, keeping lists, tables, quotes and code
/// blocks whole.
pub fn split_into_chunks(content: &str) -> Vec<String> {
    chunk_content(content).into_iter().map(|c| c.text).collect()
}

pub fn chunk_content(content: &str) -> Vec<Chunk> {
    let normalized = normalize_line_endings(content);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut splitter = Splitter::default();

    for (i, &raw) in lines.iter().enumerate() {
        let next = lines.get(i + 1).map_or("", |l| l.trim());
        splitter.push_line(raw, next);
    }

    splitter.finish()
}

fn is_table_line(line: &str, next: &str) -> bool {
    line.contains('|') && (line.split('|').count() > 2 || next.contains('|'))
}

fn is_list_item(line: &str) -> bool {
    LIST_ITEM_RE.is_match(line)
}

struct Splitter<'a> {
    mode: Mode,
    kind: Option<ChunkKind>,
    buf: Vec<&'a str>,
    chunks: Vec<Chunk>,
}

impl Default for Splitter<'_> {
    fn default() -> Self {
        Splitter {
            mode: Mode::None,
            kind: None,
            buf: Vec::new(),
            chunks: Vec::new(),
        }
    }
}

impl<'a> Splitter<'a> {
    fn push_line(&mut self, raw: &'a str, next: &str) {
        let line = raw.trim();

        if line.starts_with(FENCE) {
            self.mode = if self.mode == Mode::Codeblock {
                Mode::None
            } else {
                Mode::Codeblock
            };
            self.kind.get_or_insert(ChunkKind::Codeblock);
            self.buf.push(raw);
            return;
        }
        if self.mode == Mode::Codeblock {
            self.buf.push(raw);
            return;
        }

        // a table keeps any pipe row, even one that would not open a table
        let opens = if is_table_line(line, next) || (self.mode == Mode::Table && line.contains('|')) {
            Mode::Table
        } else if line.starts_with('>') {
            Mode::Blockquote
        } else if is_list_item(line) {
            Mode::List
        } else {
            Mode::None
        };

        match (self.mode, opens) {
            (_, Mode::None) if line.is_empty() => {
                if self.mode == Mode::None {
                    self.flush();
                } else {
                    self.buf.push(raw);
                }
            }
            (Mode::None, Mode::None) => self.buf.push(raw),
            (current, opened) if current == opened => self.buf.push(raw),
            (Mode::None, opened) => self.enter(opened, raw),
            (_, opened) => {
                self.flush();
                self.enter(opened, raw);
            }
        }
    }

    fn enter(&mut self, mode: Mode, raw: &'a str) {
        self.mode = mode;
        if let Some(kind) = mode.kind() {
            self.kind.get_or_insert(kind);
        }
        self.buf.push(raw);
    }

    fn flush(&mut self) {
        let text = self.buf.join("\n").trim().to_string();
        if !text.is_empty() {
            self.chunks.push(Chunk {
                kind: self.kind.unwrap_or(ChunkKind::Paragraph),
                text,
            });
        }
        self.buf.clear();
        self.kind = None;
        self.mode = Mode::None;
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}

// ── Tests ──
