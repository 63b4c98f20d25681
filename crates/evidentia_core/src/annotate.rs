//! crates/evidentia_core/src/annotate.rs
//!
//! The citation annotator: parses analysis text containing inline citation
//! markers and a small markdown-lite markup, and emits a structured fragment
//! plus a registry of citation-to-page mappings.
//!
//! The wire format for a citation marker is
//! `<cite data-page="P1,P2,...">N</cite>` where `N` is the visible label and
//! `P1..Pk` are 1-based page numbers. Page numbers are not validated against
//! the document here; bounds checking is deferred to navigation time.

use regex::Regex;
use std::sync::OnceLock;

/// One citation marker found in analysis text.
///
/// `raw_pages` keeps the original comma-separated page list exactly as it
/// appeared; `pages` is the parsed form. Activating a marker with multiple
/// pages always targets the first listed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRef {
    pub label: String,
    pub raw_pages: String,
    pub pages: Vec<u32>,
}

impl CitationRef {
    /// The page a click on this marker should navigate to.
    pub fn target_page(&self) -> Option<u32> {
        self.pages.first().copied()
    }
}

/// A single node of the displayable fragment. The host UI decides how each
/// variant is actually rendered; nothing here is tied to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Text(String),
    Bold(String),
    Emphasis(String),
    LineBreak,
    /// Index into the owning fragment's citation registry.
    Citation(usize),
}

/// The result of annotating one piece of analysis text: the display fragment
/// and the ordered citation registry. Duplicate markers are independent
/// registry entries, in text order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedBody {
    pub nodes: Vec<InlineNode>,
    pub registry: Vec<CitationRef>,
}

fn cite_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<cite data-page="([^"]+)">(\d+)</cite>"#).expect("valid citation regex")
    })
}

/// Parses analysis text into a display fragment and citation registry.
///
/// Pure text-to-structure transform; never fails. Malformed citation syntax
/// (unmatched tag, non-numeric page list) is passed through as literal text
/// without disturbing the rest of the message.
pub fn annotate(text: &str) -> AnnotatedBody {
    let mut body = AnnotatedBody::default();
    let mut last = 0;

    for caps in cite_regex().captures_iter(text) {
        let whole = caps.get(0).expect("match has a whole capture");
        push_inline(&text[last..whole.start()], &mut body.nodes);

        let raw_pages = &caps[1];
        match parse_page_list(raw_pages) {
            Some(pages) => {
                let index = body.registry.len();
                body.registry.push(CitationRef {
                    label: caps[2].to_string(),
                    raw_pages: raw_pages.to_string(),
                    pages,
                });
                body.nodes.push(InlineNode::Citation(index));
            }
            // Unparseable page list: keep the marker as literal text.
            None => body.nodes.push(InlineNode::Text(whole.as_str().to_string())),
        }
        last = whole.end();
    }
    push_inline(&text[last..], &mut body.nodes);
    body
}

/// Parses a comma-separated page list. Returns `None` if the list is empty
/// or any entry is non-numeric.
fn parse_page_list(raw: &str) -> Option<Vec<u32>> {
    let pages: Option<Vec<u32>> = raw
        .split(',')
        .map(|p| p.trim().parse::<u32>().ok())
        .collect();
    pages.filter(|p| !p.is_empty())
}

/// Converts a citation-free text segment into nodes, handling line breaks,
/// bold and emphasis. Spans never cross a line break.
fn push_inline(segment: &str, nodes: &mut Vec<InlineNode>) {
    for (i, line) in segment.split('\n').enumerate() {
        if i > 0 {
            nodes.push(InlineNode::LineBreak);
        }
        push_spans(line, nodes);
    }
}

/// Scans one line for `**bold**` and `*emphasis*` spans. Bold binds first;
/// an unclosed marker is kept as literal text.
fn push_spans(line: &str, nodes: &mut Vec<InlineNode>) {
    let mut rest = line;
    loop {
        let Some(star) = rest.find('*') else {
            push_text(rest, nodes);
            return;
        };
        push_text(&rest[..star], nodes);
        rest = &rest[star..];

        if let Some(stripped) = rest.strip_prefix("**") {
            match stripped.find("**") {
                Some(end) => {
                    nodes.push(InlineNode::Bold(stripped[..end].to_string()));
                    rest = &stripped[end + 2..];
                }
                None => {
                    push_text(rest, nodes);
                    return;
                }
            }
        } else {
            let stripped = &rest[1..];
            match stripped.find('*') {
                Some(end) => {
                    nodes.push(InlineNode::Emphasis(stripped[..end].to_string()));
                    rest = &stripped[end + 1..];
                }
                None => {
                    push_text(rest, nodes);
                    return;
                }
            }
        }
    }
}

fn push_text(text: &str, nodes: &mut Vec<InlineNode>) {
    if !text.is_empty() {
        nodes.push(InlineNode::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_node() {
        let body = annotate("just some text");
        assert_eq!(body.nodes, vec![InlineNode::Text("just some text".into())]);
        assert!(body.registry.is_empty());
    }

    #[test]
    fn bold_and_emphasis_become_styled_nodes() {
        let body = annotate("a **strong** and *subtle* point");
        assert_eq!(
            body.nodes,
            vec![
                InlineNode::Text("a ".into()),
                InlineNode::Bold("strong".into()),
                InlineNode::Text(" and ".into()),
                InlineNode::Emphasis("subtle".into()),
                InlineNode::Text(" point".into()),
            ]
        );
    }

    #[test]
    fn newlines_become_line_breaks() {
        let body = annotate("first\nsecond");
        assert_eq!(
            body.nodes,
            vec![
                InlineNode::Text("first".into()),
                InlineNode::LineBreak,
                InlineNode::Text("second".into()),
            ]
        );
    }

    #[test]
    fn citation_marker_registers_and_links() {
        let body = annotate(r#"see <cite data-page="2,3">5</cite> here"#);
        assert_eq!(
            body.nodes,
            vec![
                InlineNode::Text("see ".into()),
                InlineNode::Citation(0),
                InlineNode::Text(" here".into()),
            ]
        );
        assert_eq!(
            body.registry,
            vec![CitationRef {
                label: "5".into(),
                raw_pages: "2,3".into(),
                pages: vec![2, 3],
            }]
        );
    }

    #[test]
    fn registry_preserves_text_order_and_duplicates() {
        let text = r#"<cite data-page="1">1</cite> then <cite data-page="2">1</cite>"#;
        let body = annotate(text);
        assert_eq!(body.registry.len(), 2);
        assert_eq!(body.registry[0].pages, vec![1]);
        assert_eq!(body.registry[1].pages, vec![2]);
        assert_eq!(body.registry[0].label, body.registry[1].label);
    }

    #[test]
    fn multi_page_citation_targets_first_page() {
        let body = annotate(r#"<cite data-page="1,2,3">6</cite>"#);
        assert_eq!(body.registry[0].target_page(), Some(1));
        assert_eq!(body.registry[0].raw_pages, "1,2,3");
    }

    #[test]
    fn non_numeric_page_list_is_literal_text() {
        let raw = r#"<cite data-page="one,two">3</cite>"#;
        let body = annotate(raw);
        assert_eq!(body.nodes, vec![InlineNode::Text(raw.into())]);
        assert!(body.registry.is_empty());
    }

    #[test]
    fn unclosed_cite_tag_is_literal_text() {
        let raw = r#"broken <cite data-page="1">4 marker"#;
        let body = annotate(raw);
        assert!(body.registry.is_empty());
        assert_eq!(body.nodes, vec![InlineNode::Text(raw.into())]);
    }

    #[test]
    fn malformed_marker_does_not_break_the_rest() {
        let text = r#"<cite data-page="x">1</cite> ok <cite data-page="4">2</cite>"#;
        let body = annotate(text);
        assert_eq!(body.registry.len(), 1);
        assert_eq!(body.registry[0].pages, vec![4]);
        assert!(matches!(body.nodes[0], InlineNode::Text(_)));
    }

    #[test]
    fn unclosed_bold_stays_literal() {
        let body = annotate("dangling **marker");
        assert_eq!(
            body.nodes,
            vec![
                InlineNode::Text("dangling ".into()),
                InlineNode::Text("**marker".into()),
            ]
        );
    }

    #[test]
    fn bullet_glyphs_pass_through_unchanged() {
        let body = annotate("• item one\n• item two");
        assert_eq!(
            body.nodes,
            vec![
                InlineNode::Text("• item one".into()),
                InlineNode::LineBreak,
                InlineNode::Text("• item two".into()),
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_body() {
        assert_eq!(annotate(""), AnnotatedBody::default());
    }
}
