//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `SessionStore` port from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use evidentia_core::domain::{
    Document, DocumentStatus, PageText, QueryKind, QueryRecord, Session, SessionSummary,
};
use evidentia_core::ports::{PortError, PortResult, SessionStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SessionStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn fetch_queries_for_session(&self, session_id: Uuid) -> PortResult<Vec<QueryRecord>> {
        let records = sqlx::query_as::<_, QueryRow>(
            "SELECT id, session_id, document_id, owner_id, query_text, response_text, analysis_type, created_at \
             FROM analysis_queries WHERE session_id = $1 ORDER BY created_at ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(QueryRow::to_domain).collect())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    owner_id: Uuid,
    filename: String,
    size_bytes: i64,
    mime_type: String,
    page_count: i32,
    full_text: String,
    storage_ref: String,
    status: String,
}

impl DocumentRow {
    fn to_domain(self, pages: Vec<PageText>) -> Document {
        Document {
            id: Some(self.id),
            owner_id: self.owner_id,
            filename: self.filename,
            size_bytes: self.size_bytes as u64,
            mime_type: self.mime_type,
            page_count: self.page_count as u32,
            full_text: self.full_text,
            pages,
            storage_ref: self.storage_ref,
            status: DocumentStatus::parse(&self.status),
        }
    }
}

#[derive(FromRow)]
struct PageRow {
    page_number: i32,
    page_text: String,
}

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    owner_id: Uuid,
    document_id: Option<Uuid>,
    session_name: String,
    shared_link_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn to_domain(self) -> Session {
        Session {
            id: self.id,
            owner_id: self.owner_id,
            document_id: self.document_id,
            name: self.session_name,
            share_token: self.shared_link_token,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SessionSummaryRow {
    id: Uuid,
    session_name: String,
    document_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct QueryRow {
    id: Uuid,
    session_id: Uuid,
    document_id: Option<Uuid>,
    owner_id: Uuid,
    query_text: String,
    response_text: String,
    analysis_type: String,
    created_at: DateTime<Utc>,
}

impl QueryRow {
    fn to_domain(self) -> QueryRecord {
        let kind = match self.analysis_type.as_str() {
            "custom" => QueryKind::Custom,
            key => QueryKind::Template(key.to_string()),
        };
        QueryRecord {
            id: self.id,
            session_id: self.session_id,
            document_id: self.document_id,
            owner_id: self.owner_id,
            question_text: self.query_text,
            answer_text: self.response_text,
            created_at: self.created_at,
            kind,
        }
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for DbAdapter {
    async fn insert_document(&self, document: &Document) -> PortResult<Uuid> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let id = document.id.unwrap_or_else(Uuid::new_v4);
        sqlx::query(
            "INSERT INTO documents (id, owner_id, filename, size_bytes, mime_type, page_count, full_text, storage_ref, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id)
        .bind(document.owner_id)
        .bind(&document.filename)
        .bind(document.size_bytes as i64)
        .bind(&document.mime_type)
        .bind(document.page_count as i32)
        .bind(&document.full_text)
        .bind(&document.storage_ref)
        .bind(document.status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        for page in &document.pages {
            sqlx::query(
                "INSERT INTO document_pages (document_id, page_number, page_text) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(page.number as i32)
            .bind(&page.text)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(id)
    }

    async fn fetch_document(&self, document_id: Uuid) -> PortResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, owner_id, filename, size_bytes, mime_type, page_count, full_text, storage_ref, status \
             FROM documents WHERE id = $1",
        )
        .bind(document_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Document {} not found", document_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        let pages = sqlx::query_as::<_, PageRow>(
            "SELECT page_number, page_text FROM document_pages WHERE document_id = $1 ORDER BY page_number ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .into_iter()
        .map(|p| PageText {
            number: p.page_number as u32,
            text: p.page_text,
        })
        .collect();

        Ok(row.to_domain(pages))
    }

    async fn insert_session(
        &self,
        owner_id: Uuid,
        document_id: Option<Uuid>,
        name: &str,
    ) -> PortResult<Session> {
        let row = sqlx::query_as::<_, SessionRow>(
            "INSERT INTO analysis_sessions (id, owner_id, document_id, session_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, owner_id, document_id, session_name, shared_link_token, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(document_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(row.to_domain())
    }

    async fn fetch_session(&self, session_id: Uuid) -> PortResult<(Session, Vec<QueryRecord>)> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, owner_id, document_id, session_name, shared_link_token, created_at \
             FROM analysis_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Session {} not found", session_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        let queries = self.fetch_queries_for_session(session_id).await?;
        Ok((row.to_domain(), queries))
    }

    async fn fetch_session_by_share_token(
        &self,
        token: &str,
    ) -> PortResult<(Session, Vec<QueryRecord>)> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, owner_id, document_id, session_name, shared_link_token, created_at \
             FROM analysis_sessions WHERE shared_link_token = $1",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound("Shared session not found".to_string()),
            _ => PortError::Unexpected(e.to_string()),
        })?;

        let queries = self.fetch_queries_for_session(row.id).await?;
        Ok((row.to_domain(), queries))
    }

    async fn list_sessions_for_owner(&self, owner_id: Uuid) -> PortResult<Vec<SessionSummary>> {
        let rows = sqlx::query_as::<_, SessionSummaryRow>(
            "SELECT id, session_name, document_id, created_at \
             FROM analysis_sessions WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| SessionSummary {
                id: r.id,
                name: r.session_name,
                document_id: r.document_id,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn insert_query(&self, query: &QueryRecord) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO analysis_queries (id, session_id, document_id, owner_id, query_text, response_text, analysis_type, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(query.id)
        .bind(query.session_id)
        .bind(query.document_id)
        .bind(query.owner_id)
        .bind(&query.question_text)
        .bind(&query.answer_text)
        .bind(query.kind.as_str())
        .bind(query.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn set_share_token(&self, session_id: Uuid, token: &str) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE analysis_sessions SET shared_link_token = $1 WHERE id = $2",
        )
        .bind(token)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Session {} not found",
                session_id
            )));
        }
        Ok(())
    }
}
