//! crates/evidentia_core/src/session.rs
//!
//! The session lifecycle manager: owns the mapping from the open document to
//! zero-or-one active session, persists question/answer pairs, derives share
//! tokens, and supports the three load paths (fresh creation, resume by id,
//! read-only reconstruction from a shared token).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Document, ExchangeRecord, QueryKind, QueryRecord, Session, SessionSummary};
use crate::ports::{AnalysisProvider, PortResult, SessionStore};
use crate::transcript::{Role, Transcript};

/// Errors surfaced to the user by lifecycle operations. Secondary failures
/// (document lookup during resume, persistence of one exchange) are absorbed
/// with a log line and never reach this enum.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to create analysis session: {0}")]
    CreateRejected(String),
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Shared session not found or accessible")]
    SharedNotFound,
    #[error("Failed to generate share link: {0}")]
    ShareToken(String),
    #[error("This session is shared and read-only")]
    ReadOnly,
}

/// The session mode, as a single tagged state rather than a set of
/// independently toggled flags.
///
/// `SharedReadOnly` is a dead end: once a shared view is mounted, the manager
/// never transitions back for the remainder of its life.
#[derive(Debug, Clone)]
pub enum SessionPhase {
    NoSession,
    Creating,
    Active(Session),
    SharedReadOnly(Session),
}

/// Formats the shareable URL for a minted token. The `session_id` query
/// parameter is the application's entire routing surface.
pub fn share_url(origin: &str, token: &str) -> String {
    format!("{origin}/?session_id={token}")
}

/// Drives one interactive session: the open document, its transcript, the
/// persisted session record, and the share token.
///
/// Exchanges are serialized by construction: `ask` holds `&mut self` for the
/// whole question/answer cycle, so a second question cannot interleave with
/// an outstanding one.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    analysis: Arc<dyn AnalysisProvider>,
    phase: SessionPhase,
    transcript: Transcript,
    document: Option<Document>,
    title: String,
    saved_sessions: Vec<SessionSummary>,
    model: Option<String>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, analysis: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            store,
            analysis,
            phase: SessionPhase::NoSession,
            transcript: Transcript::new(),
            document: None,
            title: String::new(),
            saved_sessions: Vec::new(),
            model: None,
        }
    }

    /// Mounts a freshly rendered (and persisted) document. The document is
    /// immutable from here on; the navigator's bounds depend on its final
    /// page count.
    pub fn set_document(&mut self, document: Document) {
        self.title = document.filename.clone();
        self.document = Some(document);
    }

    /// Selects the analysis model forwarded to the provider.
    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model;
    }

    /// Creates a new session for the mounted document, scoped to `owner_id`.
    ///
    /// On success the transcript is reset and the saved-session list is
    /// refreshed (failures there are logged and ignored). On store rejection
    /// the manager stays in `NoSession`.
    pub async fn create_for_document(&mut self, owner_id: Uuid) -> Result<(), SessionError> {
        let Some(document) = &self.document else {
            return Err(SessionError::CreateRejected(
                "no document is loaded".to_string(),
            ));
        };
        let name = format!("Session for {}", document.filename);
        let filename = document.filename.clone();
        let document_id = document.id;

        self.phase = SessionPhase::Creating;
        match self.store.insert_session(owner_id, document_id, &name).await {
            Ok(session) => {
                debug!(session_id = %session.id, "new analysis session created");
                self.transcript = Transcript::new();
                self.transcript
                    .append(Role::Assistant, format!("PDF Document Loaded: \"{filename}\""));
                self.phase = SessionPhase::Active(session);
                if let Err(e) = self.refresh_saved_sessions(owner_id).await {
                    warn!("failed to refresh saved sessions: {e}");
                }
                Ok(())
            }
            Err(e) => {
                self.phase = SessionPhase::NoSession;
                Err(SessionError::CreateRejected(e.to_string()))
            }
        }
    }

    /// Resumes a saved session by id.
    ///
    /// A missing session is a hard failure. A missing linked document is
    /// not: the transcript still loads and the title falls back to a
    /// "PDF not available" variant.
    pub async fn resume(&mut self, session_id: Uuid) -> Result<(), SessionError> {
        let (session, queries) = self
            .store
            .fetch_session(session_id)
            .await
            .map_err(|_| SessionError::NotFound(session_id.to_string()))?;

        let name = if session.name.is_empty() {
            "Untitled".to_string()
        } else {
            session.name.clone()
        };
        self.document = None;
        self.title = match session.document_id {
            Some(document_id) => match self.store.fetch_document(document_id).await {
                Ok(document) => {
                    let title = format!("Session: {} - {}", name, document.filename);
                    self.document = Some(document);
                    title
                }
                Err(e) => {
                    warn!("could not load document for session {session_id}: {e}");
                    format!("Session: {name} (PDF not available)")
                }
            },
            None => format!("Session: {name} (No PDF)"),
        };

        self.rebuild_transcript(queries);
        self.phase = SessionPhase::Active(session);
        Ok(())
    }

    /// Reconstructs a session from a share token, read-only.
    ///
    /// Once this succeeds, `ask` and `ensure_share_token` are refused for
    /// the rest of the manager's life.
    pub async fn load_shared(&mut self, token: &str) -> Result<(), SessionError> {
        let (session, queries) = self
            .store
            .fetch_session_by_share_token(token)
            .await
            .map_err(|_| SessionError::SharedNotFound)?;

        self.document = None;
        self.title = match session.document_id {
            Some(document_id) => match self.store.fetch_document(document_id).await {
                Ok(document) => {
                    let title = format!("Shared: {}", document.filename);
                    self.document = Some(document);
                    title
                }
                Err(e) => {
                    warn!("could not load document for shared session: {e}");
                    "Shared Session (PDF not available)".to_string()
                }
            },
            None => "Shared Session (No PDF)".to_string(),
        };

        self.rebuild_transcript(queries);
        self.phase = SessionPhase::SharedReadOnly(session);
        Ok(())
    }

    fn rebuild_transcript(&mut self, queries: Vec<QueryRecord>) {
        let records: Vec<ExchangeRecord> = queries.into_iter().map(Into::into).collect();
        self.transcript.reconstruct(&records);
    }

    /// Runs one full question/answer exchange: appends the user message and
    /// an "Analyzing…" placeholder, calls the analysis provider, retracts
    /// the placeholder, appends the answer, and persists the pair.
    ///
    /// A provider failure becomes an `Error: …` assistant message; the
    /// transcript is never left holding the placeholder. Questions on a
    /// shared session are refused; questions with no document mounted are
    /// silently ignored.
    pub async fn ask(&mut self, question: &str, kind: QueryKind) -> Result<(), SessionError> {
        if matches!(self.phase, SessionPhase::SharedReadOnly(_)) {
            return Err(SessionError::ReadOnly);
        }
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }
        let Some(document_text) = self.document.as_ref().map(|d| d.full_text.clone()) else {
            debug!("no document text available; question ignored");
            return Ok(());
        };

        self.transcript.append(Role::User, question);
        let placeholder = self.transcript.append_pending("Analyzing document...");

        let result = self
            .analysis
            .analyze(question, &document_text, self.model.as_deref())
            .await;
        self.transcript.retract(placeholder);

        match result {
            Ok(answer) => {
                self.transcript.append(Role::Assistant, answer.clone());
                self.record_exchange(question, &answer, kind).await;
            }
            Err(e) => {
                self.transcript.append(Role::Assistant, format!("Error: {e}"));
            }
        }
        Ok(())
    }

    /// Persists one question/answer pair against the active session.
    ///
    /// With no active session this is a no-op with a local diagnostic; the
    /// exchange still lives in the transcript. A store failure is likewise
    /// logged and absorbed.
    pub async fn record_exchange(&mut self, question: &str, answer: &str, kind: QueryKind) {
        let SessionPhase::Active(session) = &self.phase else {
            debug!("no active session; exchange not persisted");
            return;
        };
        let record = QueryRecord {
            id: Uuid::new_v4(),
            session_id: session.id,
            document_id: session.document_id,
            owner_id: session.owner_id,
            question_text: question.to_string(),
            answer_text: answer.to_string(),
            created_at: Utc::now(),
            kind,
        };
        if let Err(e) = self.store.insert_query(&record).await {
            warn!("failed to save query for session {}: {e}", session.id);
        }
    }

    /// Returns the session's share token, minting one on first request.
    ///
    /// Idempotent: once issued, the same token is returned for the session's
    /// lifetime.
    pub async fn ensure_share_token(&mut self) -> Result<String, SessionError> {
        let SessionPhase::Active(session) = &mut self.phase else {
            return Err(SessionError::ShareToken(
                "start a chat session first to generate a shareable link".to_string(),
            ));
        };
        if let Some(token) = &session.share_token {
            return Ok(token.clone());
        }
        let token = Uuid::new_v4().to_string();
        self.store
            .set_share_token(session.id, &token)
            .await
            .map_err(|e| SessionError::ShareToken(e.to_string()))?;
        session.share_token = Some(token.clone());
        Ok(token)
    }

    /// Re-fetches the owner's saved sessions, newest first.
    pub async fn refresh_saved_sessions(&mut self, owner_id: Uuid) -> PortResult<()> {
        self.saved_sessions = self.store.list_sessions_for_owner(owner_id).await?;
        Ok(())
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.phase, SessionPhase::SharedReadOnly(_))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn saved_sessions(&self) -> &[SessionSummary] {
        &self.saved_sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::annotate;
    use crate::dispatch::dispatch;
    use crate::domain::{DocumentStatus, PageText};
    use crate::navigator::PageNavigator;
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStore {
        sessions: Mutex<HashMap<Uuid, Session>>,
        documents: Mutex<HashMap<Uuid, Document>>,
        queries: Mutex<Vec<QueryRecord>>,
        token_mints: Mutex<u32>,
        reject_inserts: bool,
    }

    impl MockStore {
        fn with_session(self, session: Session) -> Self {
            self.sessions
                .lock()
                .expect("lock")
                .insert(session.id, session);
            self
        }

        fn with_document(self, document: Document) -> Self {
            let id = document.id.expect("persisted document");
            self.documents.lock().expect("lock").insert(id, document);
            self
        }

        fn with_queries(self, queries: Vec<QueryRecord>) -> Self {
            *self.queries.lock().expect("lock") = queries;
            self
        }
    }

    #[async_trait]
    impl SessionStore for MockStore {
        async fn insert_document(&self, document: &Document) -> PortResult<Uuid> {
            let id = Uuid::new_v4();
            let mut stored = document.clone();
            stored.id = Some(id);
            self.documents.lock().expect("lock").insert(id, stored);
            Ok(id)
        }

        async fn fetch_document(&self, document_id: Uuid) -> PortResult<Document> {
            self.documents
                .lock()
                .expect("lock")
                .get(&document_id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("Document {document_id} not found")))
        }

        async fn insert_session(
            &self,
            owner_id: Uuid,
            document_id: Option<Uuid>,
            name: &str,
        ) -> PortResult<Session> {
            if self.reject_inserts {
                return Err(PortError::Unauthorized);
            }
            let session = Session {
                id: Uuid::new_v4(),
                owner_id,
                document_id,
                name: name.to_string(),
                share_token: None,
                created_at: Utc::now(),
            };
            self.sessions
                .lock()
                .expect("lock")
                .insert(session.id, session.clone());
            Ok(session)
        }

        async fn fetch_session(
            &self,
            session_id: Uuid,
        ) -> PortResult<(Session, Vec<QueryRecord>)> {
            let session = self
                .sessions
                .lock()
                .expect("lock")
                .get(&session_id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("Session {session_id} not found")))?;
            let queries = self
                .queries
                .lock()
                .expect("lock")
                .iter()
                .filter(|q| q.session_id == session_id)
                .cloned()
                .collect();
            Ok((session, queries))
        }

        async fn fetch_session_by_share_token(
            &self,
            token: &str,
        ) -> PortResult<(Session, Vec<QueryRecord>)> {
            let session = self
                .sessions
                .lock()
                .expect("lock")
                .values()
                .find(|s| s.share_token.as_deref() == Some(token))
                .cloned()
                .ok_or_else(|| PortError::NotFound("share token".to_string()))?;
            let id = session.id;
            let queries = self
                .queries
                .lock()
                .expect("lock")
                .iter()
                .filter(|q| q.session_id == id)
                .cloned()
                .collect();
            Ok((session, queries))
        }

        async fn list_sessions_for_owner(&self, owner_id: Uuid) -> PortResult<Vec<SessionSummary>> {
            let mut summaries: Vec<SessionSummary> = self
                .sessions
                .lock()
                .expect("lock")
                .values()
                .filter(|s| s.owner_id == owner_id)
                .map(|s| SessionSummary {
                    id: s.id,
                    name: s.name.clone(),
                    document_id: s.document_id,
                    created_at: s.created_at,
                })
                .collect();
            summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(summaries)
        }

        async fn insert_query(&self, query: &QueryRecord) -> PortResult<()> {
            self.queries.lock().expect("lock").push(query.clone());
            Ok(())
        }

        async fn set_share_token(&self, session_id: Uuid, token: &str) -> PortResult<()> {
            *self.token_mints.lock().expect("lock") += 1;
            let mut sessions = self.sessions.lock().expect("lock");
            let session = sessions
                .get_mut(&session_id)
                .ok_or_else(|| PortError::NotFound(format!("Session {session_id} not found")))?;
            session.share_token = Some(token.to_string());
            Ok(())
        }
    }

    struct CannedAnalysis;

    #[async_trait]
    impl AnalysisProvider for CannedAnalysis {
        async fn analyze(
            &self,
            question: &str,
            _document_text: &str,
            _model: Option<&str>,
        ) -> PortResult<String> {
            Ok(dispatch(question))
        }
    }

    struct FailingAnalysis;

    #[async_trait]
    impl AnalysisProvider for FailingAnalysis {
        async fn analyze(&self, _: &str, _: &str, _: Option<&str>) -> PortResult<String> {
            Err(PortError::Unexpected("backend unavailable".to_string()))
        }
    }

    fn test_document(id: Option<Uuid>) -> Document {
        Document {
            id,
            owner_id: Uuid::new_v4(),
            filename: "contract.pdf".to_string(),
            size_bytes: 1024,
            mime_type: "application/pdf".to_string(),
            page_count: 3,
            full_text: "page one page two page three".to_string(),
            pages: vec![
                PageText { number: 1, text: "page one".into() },
                PageText { number: 2, text: "page two".into() },
                PageText { number: 3, text: "page three".into() },
            ],
            storage_ref: "documents/test/contract.pdf".to_string(),
            status: DocumentStatus::Ready,
        }
    }

    fn saved_session(owner: Uuid, document_id: Option<Uuid>, token: Option<&str>) -> Session {
        Session {
            id: Uuid::new_v4(),
            owner_id: owner,
            document_id,
            name: "Session for contract.pdf".to_string(),
            share_token: token.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn query(session: &Session, q: &str, a: &str, secs: i64) -> QueryRecord {
        QueryRecord {
            id: Uuid::new_v4(),
            session_id: session.id,
            document_id: session.document_id,
            owner_id: session.owner_id,
            question_text: q.to_string(),
            answer_text: a.to_string(),
            created_at: Utc.timestamp_opt(secs, 0).single().expect("valid ts"),
            kind: QueryKind::Custom,
        }
    }

    fn manager(store: Arc<MockStore>) -> SessionManager {
        SessionManager::new(store, Arc::new(CannedAnalysis))
    }

    #[tokio::test]
    async fn create_for_document_activates_a_session() {
        let store = Arc::new(MockStore::default());
        let mut mgr = manager(store.clone());
        let owner = Uuid::new_v4();
        mgr.set_document(test_document(Some(Uuid::new_v4())));

        mgr.create_for_document(owner).await.expect("created");

        assert!(matches!(mgr.phase(), SessionPhase::Active(_)));
        assert_eq!(mgr.transcript().messages().len(), 1);
        assert!(mgr.transcript().messages()[0]
            .text
            .contains("PDF Document Loaded"));
        assert_eq!(mgr.saved_sessions().len(), 1);
    }

    #[tokio::test]
    async fn rejected_creation_reverts_to_no_session() {
        let store = Arc::new(MockStore {
            reject_inserts: true,
            ..MockStore::default()
        });
        let mut mgr = manager(store);
        mgr.set_document(test_document(Some(Uuid::new_v4())));

        let err = mgr
            .create_for_document(Uuid::new_v4())
            .await
            .expect_err("store rejects");
        assert!(matches!(err, SessionError::CreateRejected(_)));
        assert!(matches!(mgr.phase(), SessionPhase::NoSession));
    }

    #[tokio::test]
    async fn resume_reorders_history_by_timestamp() {
        let owner = Uuid::new_v4();
        let doc = test_document(Some(Uuid::new_v4()));
        let session = saved_session(owner, doc.id, None);
        let queries = vec![
            query(&session, "later q", "later a", 500),
            query(&session, "earlier q", "earlier a", 100),
        ];
        let store = Arc::new(
            MockStore::default()
                .with_document(doc)
                .with_session(session.clone())
                .with_queries(queries),
        );
        let mut mgr = manager(store);

        mgr.resume(session.id).await.expect("resumed");

        let texts: Vec<&str> = mgr
            .transcript()
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["earlier q", "earlier a", "later q", "later a"]);
        assert_eq!(mgr.title(), "Session: Session for contract.pdf - contract.pdf");
    }

    #[tokio::test]
    async fn resume_degrades_when_the_document_is_gone() {
        let owner = Uuid::new_v4();
        let session = saved_session(owner, Some(Uuid::new_v4()), None);
        let store = Arc::new(MockStore::default().with_session(session.clone()));
        let mut mgr = manager(store);

        mgr.resume(session.id).await.expect("resumes without doc");

        assert!(matches!(mgr.phase(), SessionPhase::Active(_)));
        assert_eq!(
            mgr.title(),
            "Session: Session for contract.pdf (PDF not available)"
        );
        assert!(mgr.document().is_none());
    }

    #[tokio::test]
    async fn resume_of_unknown_session_is_a_hard_failure() {
        let mut mgr = manager(Arc::new(MockStore::default()));
        let err = mgr.resume(Uuid::new_v4()).await.expect_err("missing");
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn ask_appends_annotated_answer_and_persists() {
        let store = Arc::new(MockStore::default());
        let mut mgr = manager(store.clone());
        mgr.set_document(test_document(Some(Uuid::new_v4())));
        mgr.create_for_document(Uuid::new_v4()).await.expect("created");

        mgr.ask("What are the red flags in this contract?", QueryKind::Custom)
            .await
            .expect("asked");

        let messages = mgr.transcript().messages();
        let last = messages.last().expect("answer appended");
        assert_eq!(last.role, Role::Assistant);
        assert!(!last.pending);
        assert!(last.text.contains("Red Flags Identified"));

        // The appended registry is exactly what annotating the answer yields.
        let body = last.body.as_ref().expect("annotated");
        assert_eq!(body.registry, annotate(&last.text).registry);

        let persisted = store.queries.lock().expect("lock");
        assert_eq!(persisted.len(), 1);
        assert!(persisted[0].answer_text.contains("Red Flags Identified"));
    }

    #[tokio::test]
    async fn ask_without_a_session_keeps_the_exchange_local() {
        let store = Arc::new(MockStore::default());
        let mut mgr = manager(store.clone());
        mgr.set_document(test_document(None));

        mgr.ask("summary please", QueryKind::Custom).await.expect("asked");

        assert_eq!(mgr.transcript().messages().len(), 2);
        assert!(store.queries.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn provider_failure_becomes_an_error_message() {
        let store = Arc::new(MockStore::default());
        let mut mgr = SessionManager::new(store.clone(), Arc::new(FailingAnalysis));
        mgr.set_document(test_document(Some(Uuid::new_v4())));
        mgr.create_for_document(Uuid::new_v4()).await.expect("created");

        mgr.ask("anything", QueryKind::Custom).await.expect("asked");

        let last = mgr.transcript().messages().last().expect("message");
        assert!(last.text.starts_with("Error:"));
        assert!(mgr.transcript().messages().iter().all(|m| !m.pending));
        assert!(store.queries.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn share_token_is_minted_exactly_once() {
        let store = Arc::new(MockStore::default());
        let mut mgr = manager(store.clone());
        mgr.set_document(test_document(Some(Uuid::new_v4())));
        mgr.create_for_document(Uuid::new_v4()).await.expect("created");

        let first = mgr.ensure_share_token().await.expect("minted");
        let second = mgr.ensure_share_token().await.expect("cached");

        assert_eq!(first, second);
        assert_eq!(*store.token_mints.lock().expect("lock"), 1);
        assert_eq!(
            share_url("https://evidentia.app", &first),
            format!("https://evidentia.app/?session_id={first}")
        );
    }

    #[tokio::test]
    async fn share_token_requires_an_active_session() {
        let mut mgr = manager(Arc::new(MockStore::default()));
        let err = mgr.ensure_share_token().await.expect_err("no session");
        assert!(matches!(err, SessionError::ShareToken(_)));
    }

    #[tokio::test]
    async fn shared_session_without_document_is_read_only() {
        let owner = Uuid::new_v4();
        let mut session = saved_session(owner, None, Some("tok-123"));
        session.document_id = None;
        let queries = vec![query(&session, "q1", "a1", 10)];
        let store = Arc::new(
            MockStore::default()
                .with_session(session)
                .with_queries(queries),
        );
        let mut mgr = manager(store);

        mgr.load_shared("tok-123").await.expect("loaded");

        assert_eq!(mgr.title(), "Shared Session (No PDF)");
        assert!(mgr.is_read_only());
        assert_eq!(mgr.transcript().messages().len(), 2);

        let err = mgr.ask("another question", QueryKind::Custom).await;
        assert!(matches!(err, Err(SessionError::ReadOnly)));
        let err = mgr.ensure_share_token().await;
        assert!(matches!(err, Err(SessionError::ShareToken(_))));
    }

    #[tokio::test]
    async fn unknown_share_token_is_not_found() {
        let mut mgr = manager(Arc::new(MockStore::default()));
        let err = mgr.load_shared("missing").await.expect_err("unknown token");
        assert!(matches!(err, SessionError::SharedNotFound));
    }

    #[tokio::test]
    async fn citation_in_answer_navigates_to_its_first_page() {
        let store = Arc::new(MockStore::default());
        let mut mgr = manager(store);
        let document = test_document(Some(Uuid::new_v4()));
        let page_count = document.page_count;
        mgr.set_document(document);
        mgr.create_for_document(Uuid::new_v4()).await.expect("created");

        // The summary body ends with a marker citing pages 1,2,3.
        mgr.ask("summary", QueryKind::Template("summary".to_string()))
            .await
            .expect("asked");

        let last = mgr.transcript().messages().last().expect("answer");
        let registry = &last.body.as_ref().expect("annotated").registry;
        let multi = registry
            .iter()
            .find(|c| c.pages.len() > 1)
            .expect("multi-page citation present");

        let mut nav = PageNavigator::new(page_count);
        nav.go_to(3);
        assert_eq!(nav.activate(multi), Some(multi.pages[0]));
        assert_eq!(nav.current_page(), multi.pages[0]);
    }
}
