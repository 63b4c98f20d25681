//! crates/evidentia_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or analysis backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Document, QueryRecord, RenderedDocument, Session, SessionSummary,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services
/// (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistent storage for documents, sessions, and query history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    // --- Document Records ---
    async fn insert_document(&self, document: &Document) -> PortResult<Uuid>;

    async fn fetch_document(&self, document_id: Uuid) -> PortResult<Document>;

    // --- Session Records ---
    async fn insert_session(
        &self,
        owner_id: Uuid,
        document_id: Option<Uuid>,
        name: &str,
    ) -> PortResult<Session>;

    /// Fetches a session together with its full query history.
    async fn fetch_session(&self, session_id: Uuid) -> PortResult<(Session, Vec<QueryRecord>)>;

    /// Resolves a share token to a session and its full query history.
    async fn fetch_session_by_share_token(
        &self,
        token: &str,
    ) -> PortResult<(Session, Vec<QueryRecord>)>;

    /// Lists a user's sessions, newest first.
    async fn list_sessions_for_owner(&self, owner_id: Uuid) -> PortResult<Vec<SessionSummary>>;

    // --- Query Records ---
    async fn insert_query(&self, query: &QueryRecord) -> PortResult<()>;

    /// Persists a freshly minted share token on a session (single-field update).
    async fn set_share_token(&self, session_id: Uuid, token: &str) -> PortResult<()>;
}

/// Produces citation-annotated analysis text for a question about a document.
///
/// The contract is question in, citation-annotated text out; a real language
/// model backend must preserve it so the rest of the core is unaffected by
/// swapping the implementation.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        question: &str,
        document_text: &str,
        model: Option<&str>,
    ) -> PortResult<String>;
}

/// Turns raw uploaded bytes into page count, per-page text, and full text.
/// Callable once per document; no streaming contract.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn open(&self, bytes: &[u8]) -> PortResult<RenderedDocument>;
}
