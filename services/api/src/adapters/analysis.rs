//! services/api/src/adapters/analysis.rs
//!
//! The default `AnalysisProvider` implementation: the in-process template
//! dispatcher from the core crate. This is the simulated analysis backend;
//! swapping in a real model (see `llm.rs`) must preserve the same contract.

use std::time::Duration;

use async_trait::async_trait;
use evidentia_core::dispatch::dispatch;
use evidentia_core::ports::{AnalysisProvider, PortResult};
use tracing::debug;

/// Serves canned, citation-annotated analysis bodies via template dispatch.
pub struct CannedAnalysisAdapter {
    /// Optional artificial latency, mimicking a real backend's thinking time.
    delay: Duration,
}

impl CannedAnalysisAdapter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AnalysisProvider for CannedAnalysisAdapter {
    async fn analyze(
        &self,
        question: &str,
        _document_text: &str,
        model: Option<&str>,
    ) -> PortResult<String> {
        if let Some(model) = model {
            debug!("canned analysis ignores the requested model '{model}'");
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(dispatch(question))
    }
}
