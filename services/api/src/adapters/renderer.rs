//! services/api/src/adapters/renderer.rs
//!
//! A plain-text implementation of the `DocumentRenderer` port. Real PDF
//! rasterization and extraction happen outside this service; this adapter
//! stands in for that collaborator by paginating UTF-8 text so the rest of
//! the pipeline (page-bounded navigation, per-page citations) has real page
//! data to work against.

use async_trait::async_trait;
use evidentia_core::domain::{PageText, RenderedDocument};
use evidentia_core::ports::{DocumentRenderer, PortError, PortResult};

const FORM_FEED: char = '\u{c}';

/// Splits uploaded text into pages: on form feeds when present, otherwise by
/// a per-page character budget.
pub struct TextPageRenderer {
    page_char_limit: usize,
}

impl TextPageRenderer {
    pub fn new(page_char_limit: usize) -> Self {
        Self {
            // A zero budget would never terminate pagination.
            page_char_limit: page_char_limit.max(1),
        }
    }
}

#[async_trait]
impl DocumentRenderer for TextPageRenderer {
    async fn open(&self, bytes: &[u8]) -> PortResult<RenderedDocument> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| PortError::Unexpected(format!("document is not valid UTF-8: {e}")))?;

        let page_texts = paginate(text, self.page_char_limit);
        let full_text = page_texts.join(" ");
        let pages: Vec<PageText> = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText {
                number: (i + 1) as u32,
                text,
            })
            .collect();

        Ok(RenderedDocument {
            page_count: pages.len() as u32,
            pages,
            full_text,
        })
    }
}

/// Always yields at least one page, so a document's page count is never zero.
fn paginate(text: &str, limit: usize) -> Vec<String> {
    let text = text.trim();
    if text.contains(FORM_FEED) {
        return text.split(FORM_FEED).map(|p| p.trim().to_string()).collect();
    }

    let mut pages = Vec::new();
    let mut rest = text;
    while rest.len() > limit {
        let mut boundary = limit;
        while !rest.is_char_boundary(boundary) {
            boundary -= 1;
        }
        // Prefer breaking at whitespace so words stay whole.
        let cut = match rest[..boundary].rfind(char::is_whitespace) {
            Some(i) if i > 0 => i,
            _ => boundary,
        };
        pages.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }
    if !rest.is_empty() || pages.is_empty() {
        pages.push(rest.to_string());
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn short_text_is_a_single_page() {
        let renderer = TextPageRenderer::new(100);
        let doc = renderer.open(b"a short document").await.expect("opened");
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[0].text, "a short document");
    }

    #[tokio::test]
    async fn form_feeds_mark_page_boundaries() {
        let renderer = TextPageRenderer::new(1000);
        let doc = renderer
            .open("page one\u{c}page two\u{c}page three".as_bytes())
            .await
            .expect("opened");
        assert_eq!(doc.page_count, 3);
        assert_eq!(doc.pages[2].text, "page three");
        assert_eq!(doc.full_text, "page one page two page three");
    }

    #[tokio::test]
    async fn long_text_splits_on_word_boundaries() {
        let renderer = TextPageRenderer::new(10);
        let doc = renderer.open(b"alpha beta gamma delta").await.expect("opened");
        assert!(doc.page_count > 1);
        for page in &doc.pages {
            assert!(page.text.len() <= 10);
        }
        // Page numbers stay contiguous from 1.
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.number, (i + 1) as u32);
        }
    }

    #[tokio::test]
    async fn empty_upload_still_has_one_page() {
        let renderer = TextPageRenderer::new(100);
        let doc = renderer.open(b"").await.expect("opened");
        assert_eq!(doc.page_count, 1);
    }

    #[tokio::test]
    async fn non_utf8_bytes_are_rejected() {
        let renderer = TextPageRenderer::new(100);
        let err = renderer.open(&[0xff, 0xfe, 0x00]).await.expect_err("invalid");
        assert!(matches!(err, PortError::Unexpected(_)));
    }
}
