use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::lines::{classify_lines, Line};

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
// opening `*` must not follow a word character, so `5*3*2` stays intact
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w*])\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());
static ANGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:strong|ul|li)>|<br>|[<>]").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

#[derive(Debug)]
enum Block {
    Text(String),
    List { kind: ListKind, items: Vec<String> },
    Break,
}

/// Flatten Markdown content into a single line of HTML using only
/// `<strong>`, `<ul><li>` and `<br><br>`. Total over all inputs.
pub fn to_display_html(content: &str) -> String {
    let blocks = group_blocks(classify_lines(content));
    let mut out = String::new();
    let mut prev_was_break = true;

    for block in &blocks {
        let is_break = matches!(block, Block::Break);
        if !prev_was_break && !is_break {
            out.push(' ');
        }
        match block {
            Block::Text(text) => out.push_str(&inline(text)),
            Block::List { items, .. } => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&inline(item));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Block::Break => out.push_str("<br><br>"),
        }
        prev_was_break = is_break;
    }

    WS_RE.replace_all(&out, " ").trim().to_string()
}

/// Fold tagged lines into paragraphs, same-kind list runs and paragraph breaks.
fn group_blocks(lines: Vec<Line>) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in lines {
        match line {
            Line::Blank => {
                if matches!(blocks.last(), Some(b) if !matches!(b, Block::Break)) {
                    blocks.push(Block::Break);
                }
            }
            Line::BulletItem(item) => push_item(&mut blocks, ListKind::Bullet, item),
            Line::NumberedItem(item) => push_item(&mut blocks, ListKind::Numbered, item),
            Line::Plain(text) => match blocks.last_mut() {
                // lazy continuation of the previous list item
                Some(Block::List { items, .. }) => {
                    if let Some(last) = items.last_mut() {
                        last.push(' ');
                        last.push_str(&text);
                    }
                }
                Some(Block::Text(prev)) => {
                    prev.push(' ');
                    prev.push_str(&text);
                }
                _ => blocks.push(Block::Text(text)),
            },
            Line::Heading(text) => match blocks.last_mut() {
                Some(Block::Text(prev)) => {
                    prev.push(' ');
                    prev.push_str(&text);
                }
                _ => blocks.push(Block::Text(text)),
            },
        }
    }

    if matches!(blocks.last(), Some(Block::Break)) {
        blocks.pop();
    }
    blocks
}

fn push_item(blocks: &mut Vec<Block>, kind: ListKind, item: String) {
    // a blank line between two items of the same kind keeps the list open
    let reopens = matches!(
        blocks.as_slice(),
        [.., Block::List { kind: current, .. }, Block::Break] if *current == kind
    );
    if reopens {
        blocks.pop();
    }
    if let Some(Block::List { kind: current, items }) = blocks.last_mut() {
        if *current == kind {
            items.push(item);
            return;
        }
    }
    blocks.push(Block::List {
        kind,
        items: vec![item],
    });
}

fn inline(text: &str) -> String {
    let escaped = ANGLE_RE.replace_all(text, |caps: &Captures| match &caps[0] {
        "<" => "&lt;".to_string(),
        ">" => "&gt;".to_string(),
        tag => tag.to_string(),
    });
    let bold = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&bold, "${1}${2}").into_owned()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_markers_removed() {
        let html = to_display_html("## Title");
        assert!(!html.contains('#'));
        assert_eq!(html, "Title");
    }

    #[test]
    fn bullets_grouped_into_one_list() {
        let html = to_display_html("* a\n* b\n* c");
        assert_eq!(html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 3);
    }

    #[test]
    fn mixed_bullet_glyphs_share_a_list() {
        let html = to_display_html("* Asterisk bullet\n• Bullet point\n- Dash bullet");
        assert_eq!(
            html,
            "<ul><li>Asterisk bullet</li><li>Bullet point</li><li>Dash bullet</li></ul>"
        );
    }

    #[test]
    fn bullet_and_numbered_runs_are_separate_lists() {
        let html = to_display_html("- a\n- b\n1. one\n2. two");
        assert_eq!(
            html,
            "<ul><li>a</li><li>b</li></ul> <ul><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(to_display_html(""), "");
        assert_eq!(to_display_html("  \n\n "), "");
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            to_display_html("This is **important text** and *quietly* **also bold**."),
            "This is <strong>important text</strong> and quietly <strong>also bold</strong>."
        );
    }

    #[test]
    fn bold_across_single_line_break() {
        assert_eq!(
            to_display_html("A **bold\nspan** here"),
            "A <strong>bold span</strong> here"
        );
    }

    #[test]
    fn paragraphs_become_double_breaks() {
        assert_eq!(
            to_display_html("First line\nstill first\n\n\nSecond"),
            "First line still first<br><br>Second"
        );
    }

    #[test]
    fn list_followed_by_paragraph() {
        let html = to_display_html(
            "## Title Here\n\nThis is a paragraph with **bold text**.\n\n* First bullet\n* Second bullet with **bold**\n\nAnother paragraph.",
        );
        assert_eq!(
            html,
            "Title Here<br><br>This is a paragraph with <strong>bold text</strong>.<br><br>\
             <ul><li>First bullet</li><li>Second bullet with <strong>bold</strong></li></ul>\
             <br><br>Another paragraph."
        );
    }

    #[test]
    fn malformed_markdown_does_not_panic() {
        let html = to_display_html("##Title without space\n*Bullet without space\n**Incomplete bold");
        assert!(html.starts_with("Title without space"));
        assert!(!html.contains('#'));
        assert!(html.contains("<li>Bullet without space"));
        assert!(html.contains("**Incomplete bold"));
    }

    #[test]
    fn second_pass_keeps_strong_tags() {
        let once = to_display_html("Lead with **impact**\n\n- **one**\n- two");
        let twice = to_display_html(&once);
        assert_eq!(once, twice);
        assert!(twice.contains("<strong>impact</strong>"));
    }

    #[test]
    fn stray_angle_brackets_are_escaped() {
        assert_eq!(
            to_display_html("a <script>x</script> b"),
            "a &lt;script&gt;x&lt;/script&gt; b"
        );
    }

    #[test]
    fn underline_headings_collapse() {
        assert_eq!(to_display_html("Title\n=====\nBody text"), "Title Body text");
    }

    #[test]
    fn loose_list_stays_one_list() {
        assert_eq!(
            to_display_html("1. one\n\n2. two\n\n3. three"),
            "<ul><li>one</li><li>two</li><li>three</li></ul>"
        );
        assert_eq!(
            to_display_html("- a\n\n1. one\n\nAfter"),
            "<ul><li>a</li></ul><br><br><ul><li>one</li></ul><br><br>After"
        );
    }

    #[test]
    fn arithmetic_asterisks_are_kept() {
        assert_eq!(to_display_html("Growth was 5*3*2 times"), "Growth was 5*3*2 times");
        assert_eq!(to_display_html("A *lead* and 2*x*y"), "A lead and 2*x*y");
    }

    #[test]
    fn crlf_input() {
        assert_eq!(to_display_html("a\r\n\r\nb"), "a<br><br>b");
    }
}
