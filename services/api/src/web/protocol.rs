//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! API server, plus the serializable view structs for transcript content.
//! The core domain types stay serde-free; everything crossing the wire is
//! converted here.

use chrono::{DateTime, Utc};
use evidentia_core::annotate::InlineNode;
use evidentia_core::domain::SessionSummary;
use evidentia_core::transcript::{Message, Role, Transcript};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
/// The first message on a connection must be one of the three init variants.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts a fresh session for an uploaded document.
    Init {
        document_id: Uuid,
        model: Option<String>,
    },

    /// Resumes a saved session by id.
    InitResume { session_id: Uuid },

    /// Opens a shared session read-only via its share token.
    InitShared { token: String },

    /// A free-text question about the open document.
    Ask { question: String },

    /// One of the fixed analysis template buttons.
    Template { key: String },

    /// A direct page-thumbnail click.
    GoToPage { page: u32 },

    /// A click on a citation marker inside an assistant message.
    ActivateCitation { message_id: Uuid, citation: usize },

    /// Requests the shareable link, minting the token on first use.
    RequestShareLink,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms successful initialization of one of the three load paths.
    SessionInitialized {
        title: String,
        page_count: Option<u32>,
        read_only: bool,
    },

    /// A full snapshot of the transcript, sent whenever its revision moves.
    Transcript {
        revision: u64,
        messages: Vec<MessageView>,
    },

    /// The user's saved sessions, newest first.
    SavedSessions { sessions: Vec<SessionSummaryView> },

    /// Signals that a question is being analyzed; the UI can show a
    /// "thinking" state.
    AnalysisStarted,

    /// Signals that the analysis finished (the transcript snapshot carries
    /// the outcome).
    AnalysisEnded,

    /// The viewport should scroll to this page and mark it active.
    PageChanged { page: u32 },

    /// The shareable URL for the current session.
    ShareLink { url: String },

    /// Reports an error to the client, which should display a message.
    Error { message: String },
}

//=========================================================================================
// View Structs
//=========================================================================================

/// One node of a rendered message body. Mirrors the core's `InlineNode`
/// without tying the core to a serialization format.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeView {
    Text { text: String },
    Bold { text: String },
    Emphasis { text: String },
    LineBreak,
    /// An interactive citation reference: `citation` indexes the message's
    /// registry and is what `ActivateCitation` echoes back.
    Citation {
        citation: usize,
        label: String,
        pages: String,
    },
}

/// A serializable transcript entry.
#[derive(Serialize, Debug, Clone)]
pub struct MessageView {
    pub id: Uuid,
    pub role: &'static str,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub pending: bool,
    /// Present on annotated assistant messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeView>>,
}

impl MessageView {
    pub fn from_domain(message: &Message) -> Self {
        let nodes = message.body.as_ref().map(|body| {
            body.nodes
                .iter()
                .map(|node| match node {
                    InlineNode::Text(text) => NodeView::Text { text: text.clone() },
                    InlineNode::Bold(text) => NodeView::Bold { text: text.clone() },
                    InlineNode::Emphasis(text) => NodeView::Emphasis { text: text.clone() },
                    InlineNode::LineBreak => NodeView::LineBreak,
                    InlineNode::Citation(index) => {
                        let citation = &body.registry[*index];
                        NodeView::Citation {
                            citation: *index,
                            label: citation.label.clone(),
                            pages: citation.raw_pages.clone(),
                        }
                    }
                })
                .collect()
        });
        MessageView {
            id: message.id,
            role: match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            text: message.text.clone(),
            created_at: message.created_at,
            pending: message.pending,
            nodes,
        }
    }
}

/// Builds the transcript snapshot message for the current revision.
pub fn transcript_snapshot(transcript: &Transcript) -> ServerMessage {
    ServerMessage::Transcript {
        revision: transcript.revision(),
        messages: transcript.messages().iter().map(MessageView::from_domain).collect(),
    }
}

/// A saved-session list entry.
#[derive(Serialize, Debug, Clone)]
pub struct SessionSummaryView {
    pub id: Uuid,
    pub name: String,
    pub document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl SessionSummaryView {
    pub fn from_domain(summary: &SessionSummary) -> Self {
        SessionSummaryView {
            id: summary.id,
            name: summary.name.clone(),
            document_id: summary.document_id,
            created_at: summary.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_core::transcript::{Role, Transcript};

    #[test]
    fn assistant_message_views_carry_citation_nodes() {
        let mut transcript = Transcript::new();
        transcript.append(
            Role::Assistant,
            r#"see <cite data-page="1,2,3">6</cite> for detail"#,
        );

        let view = MessageView::from_domain(&transcript.messages()[0]);
        let nodes = view.nodes.expect("assistant body present");
        assert!(nodes.contains(&NodeView::Citation {
            citation: 0,
            label: "6".to_string(),
            pages: "1,2,3".to_string(),
        }));
    }

    #[test]
    fn user_message_views_are_plain() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "a question");
        let view = MessageView::from_domain(&transcript.messages()[0]);
        assert_eq!(view.role, "user");
        assert!(view.nodes.is_none());
    }

    #[test]
    fn client_messages_deserialize_from_tagged_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"go_to_page","page":4}"#).expect("valid json");
        assert!(matches!(msg, ClientMessage::GoToPage { page: 4 }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"request_share_link"}"#).expect("valid json");
        assert!(matches!(msg, ClientMessage::RequestShareLink));
    }

    #[test]
    fn transcript_snapshot_reports_the_revision() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "q");
        match transcript_snapshot(&transcript) {
            ServerMessage::Transcript { revision, messages } => {
                assert_eq!(revision, transcript.revision());
                assert_eq!(messages.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
