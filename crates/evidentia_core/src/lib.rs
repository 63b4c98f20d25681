pub mod annotate;
pub mod dispatch;
pub mod domain;
pub mod navigator;
pub mod ports;
pub mod session;
pub mod transcript;

pub use annotate::{annotate, AnnotatedBody, CitationRef, InlineNode};
pub use domain::{
    Document, DocumentStatus, ExchangeRecord, PageText, QueryKind, QueryRecord, RenderedDocument,
    Session, SessionSummary,
};
pub use navigator::PageNavigator;
pub use ports::{AnalysisProvider, DocumentRenderer, PortError, PortResult, SessionStore};
pub use session::{share_url, SessionError, SessionManager, SessionPhase};
pub use transcript::{Message, Role, Transcript};
