//! crates/evidentia_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Extracted text of a single document page. Pages are numbered 1..N with no
/// gaps; the sequence is fixed once extraction completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

/// Processing state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Processing,
    Ready,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "processing" => DocumentStatus::Processing,
            _ => DocumentStatus::Ready,
        }
    }
}

/// A document uploaded by a user, with its extracted text.
///
/// `id` is `None` until the document has been persisted; everything else is
/// immutable after extraction within one load.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Option<Uuid>,
    pub owner_id: Uuid,
    pub filename: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub page_count: u32,
    pub full_text: String,
    pub pages: Vec<PageText>,
    pub storage_ref: String,
    pub status: DocumentStatus,
}

/// An analysis session owned by a user, optionally linked to a document.
///
/// `share_token` is absent until the first share request; once minted it is
/// stable for the session's lifetime.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub document_id: Option<Uuid>,
    pub name: String,
    pub share_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A slim view of a session used for the saved-sessions list.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: Uuid,
    pub name: String,
    pub document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// How a query was produced: from one of the fixed analysis template buttons,
/// or typed freely by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Template(String),
    Custom,
}

impl QueryKind {
    pub fn as_str(&self) -> &str {
        match self {
            QueryKind::Template(key) => key,
            QueryKind::Custom => "custom",
        }
    }
}

/// A persisted question/answer pair belonging to a session.
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub document_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub question_text: String,
    pub answer_text: String,
    pub created_at: DateTime<Utc>,
    pub kind: QueryKind,
}

/// The portion of a `QueryRecord` the transcript needs to rebuild one
/// user/assistant exchange.
#[derive(Debug, Clone)]
pub struct ExchangeRecord {
    pub question_text: String,
    pub answer_text: String,
    pub created_at: DateTime<Utc>,
}

impl From<QueryRecord> for ExchangeRecord {
    fn from(q: QueryRecord) -> Self {
        ExchangeRecord {
            question_text: q.question_text,
            answer_text: q.answer_text,
            created_at: q.created_at,
        }
    }
}

/// A freshly rendered document: page count, per-page extracted text, and the
/// concatenated full text. Produced by the `DocumentRenderer` port.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub page_count: u32,
    pub pages: Vec<PageText>,
    pub full_text: String,
}
