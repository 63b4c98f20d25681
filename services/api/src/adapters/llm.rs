//! services/api/src/adapters/llm.rs
//!
//! An `AnalysisProvider` backed by an OpenAI-compatible language model.
//! Enabled when an API key is configured; otherwise the service runs on the
//! canned dispatcher. The model is instructed to emit the same citation
//! markup the annotator consumes, so the two backends are interchangeable.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a document analysis assistant. You receive the full extracted text of a document, organized page by page, and a question about it.

Write your analysis in a compact markdown-lite style:
- **bold** for section headings and key phrases, *emphasis* sparingly.
- Bullet lines starting with the • glyph.
- Whenever a finding is grounded in the document, attach a citation marker of the exact form <cite data-page="P1,P2">N</cite>, where P1,P2 are the 1-based page numbers the finding comes from and N is a running marker number starting at 1.

Rules for citation markers:
- Page numbers must refer to pages of the provided document.
- Number markers sequentially in the order they appear in your answer.
- Do not invent any other tag or attribute; the client only understands the exact <cite data-page="...">N</cite> shape.

Keep the answer focused on the question. Do not restate the whole document."#;

const USER_INPUT_TEMPLATE: &str = r#"DOCUMENT TEXT:
---
{document}
---

QUESTION:
{question}"#;

use async_openai::{config::OpenAIConfig, types::responses::CreateResponseArgs, Client};
use async_trait::async_trait;
use evidentia_core::ports::{AnalysisProvider, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AnalysisProvider` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter` with the default model.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `AnalysisProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnalysisProvider for OpenAiAnalysisAdapter {
    async fn analyze(
        &self,
        question: &str,
        document_text: &str,
        model: Option<&str>,
    ) -> PortResult<String> {
        let user_input = USER_INPUT_TEMPLATE
            .replace("{document}", document_text)
            .replace("{question}", question);

        let request = CreateResponseArgs::default()
            .model(model.unwrap_or(&self.model))
            .instructions(SYSTEM_INSTRUCTIONS)
            .input(user_input)
            .max_output_tokens(1500u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .responses()
            .create(request)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let answer = response.output_text().unwrap_or_default();
        if answer.trim().is_empty() {
            return Err(PortError::Unexpected(
                "analysis backend returned an empty response".to_string(),
            ));
        }
        Ok(answer)
    }
}
