use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s*(.+)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*•\-]\s*(.+)$").unwrap());
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.(?:\s+(.+)|([^\d\s].*))$").unwrap());
static UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:={3,}|-{3,})$").unwrap());
static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:[-*_]\s*){3,}$").unwrap());
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:>\s?)+").unwrap());

/// One content line, tagged by the role it plays in flat rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading(String),
    BulletItem(String),
    NumberedItem(String),
    Plain(String),
    Blank,
}

/// Unify `\r\n` and bare `\r` into `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Line endings plus JSON-escaped `\n` sequences left in the text.
pub fn normalize_newlines(text: &str) -> String {
    normalize_line_endings(text)
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
}

/// Tag every line of `content`. Setext underlines (`===`, `---` right below a
/// text line) are folded into the line above.
pub fn classify_lines(content: &str) -> Vec<Line> {
    let normalized = normalize_newlines(content);
    let raw: Vec<&str> = normalized.trim().lines().collect();
    let mut lines = Vec::with_capacity(raw.len());

    for (i, line) in raw.iter().enumerate() {
        let trimmed = line.trim();
        let follows_text = i > 0 && !raw[i - 1].trim().is_empty();
        if follows_text && UNDERLINE_RE.is_match(trimmed) {
            continue;
        }
        lines.push(classify_line(trimmed));
    }

    lines
}

fn classify_line(line: &str) -> Line {
    if line.is_empty() || RULE_RE.is_match(line) {
        return Line::Blank;
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        return Line::Heading(caps[1].trim().to_string());
    }

    // `**bold** lead-in` is emphasis, not a `*` bullet
    if !line.starts_with("**") {
        if let Some(caps) = BULLET_RE.captures(line) {
            return Line::BulletItem(caps[1].trim().to_string());
        }
    }

    if let Some(caps) = NUMBERED_RE.captures(line) {
        let text = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        return Line::NumberedItem(text.trim().to_string());
    }

    if let Some(m) = QUOTE_RE.find(line) {
        let rest = line[m.end()..].trim();
        if rest.is_empty() {
            return Line::Blank;
        }
        return classify_line(rest);
    }

    Line::Plain(line.to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_with_and_without_space() {
        assert_eq!(classify_lines("## Title"), vec![Line::Heading("Title".into())]);
        assert_eq!(classify_lines("##Title"), vec![Line::Heading("Title".into())]);
        assert_eq!(classify_lines("###### Deep"), vec![Line::Heading("Deep".into())]);
    }

    #[test]
    fn bullet_glyphs() {
        let lines = classify_lines("* one\n• two\n- three\n*four");
        assert_eq!(
            lines,
            vec![
                Line::BulletItem("one".into()),
                Line::BulletItem("two".into()),
                Line::BulletItem("three".into()),
                Line::BulletItem("four".into()),
            ]
        );
    }

    #[test]
    fn bold_lead_in_is_not_a_bullet() {
        assert_eq!(
            classify_lines("**Bold** opener"),
            vec![Line::Plain("**Bold** opener".into())]
        );
    }

    #[test]
    fn numbered_items() {
        let lines = classify_lines("1. first\n2.second\n10.  tenth");
        assert_eq!(
            lines,
            vec![
                Line::NumberedItem("first".into()),
                Line::NumberedItem("second".into()),
                Line::NumberedItem("tenth".into()),
            ]
        );
    }

    #[test]
    fn decimal_number_is_plain() {
        assert_eq!(
            classify_lines("3.5x faster planning"),
            vec![Line::Plain("3.5x faster planning".into())]
        );
    }

    #[test]
    fn setext_underlines_collapse() {
        assert_eq!(
            classify_lines("Title\n=====\nBody"),
            vec![Line::Plain("Title".into()), Line::Plain("Body".into())]
        );
        assert_eq!(
            classify_lines("Title\n---\nBody"),
            vec![Line::Plain("Title".into()), Line::Plain("Body".into())]
        );
    }

    #[test]
    fn standalone_rule_is_blank() {
        assert_eq!(
            classify_lines("Above\n\n---\n\nBelow"),
            vec![
                Line::Plain("Above".into()),
                Line::Blank,
                Line::Blank,
                Line::Blank,
                Line::Plain("Below".into()),
            ]
        );
    }

    #[test]
    fn quote_markers_are_stripped() {
        assert_eq!(
            classify_lines("> The choice is simple"),
            vec![Line::Plain("The choice is simple".into())]
        );
        assert_eq!(classify_lines("> - quoted item"), vec![Line::BulletItem("quoted item".into())]);
    }

    #[test]
    fn line_endings_and_escaped_newlines() {
        let expected = vec![Line::Plain("a".into()), Line::Plain("b".into()), Line::Plain("c".into())];
        assert_eq!(classify_lines("a\r\nb\rc"), expected);
        assert_eq!(classify_lines("a\\nb\\nc"), expected);
    }

    #[test]
    fn empty_input() {
        assert!(classify_lines("").is_empty());
        assert!(classify_lines("   \n  ").is_empty());
    }
}
