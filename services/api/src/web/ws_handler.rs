//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns one `SessionManager` and one `PageNavigator`; all
//! client messages are handled sequentially on the connection task, so
//! question submissions are serialized by construction.

use crate::web::{
    protocol::{transcript_snapshot, ClientMessage, ServerMessage, SessionSummaryView},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use evidentia_core::dispatch::template_prompt;
use evidentia_core::domain::QueryKind;
use evidentia_core::navigator::PageNavigator;
use evidentia_core::session::{share_url, SessionError, SessionManager};
use futures::{
    stream::{SplitSink, SplitStream, StreamExt},
    SinkExt,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

type WsSender = SplitSink<WebSocket, Message>;
type WsReceiver = SplitStream<WebSocket>;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, user_id))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, user_id: Uuid) {
    info!("New WebSocket connection established for user: {}", user_id);

    let (mut sender, mut receiver) = socket.split();

    let mut manager = SessionManager::new(app_state.store.clone(), app_state.analysis.clone());
    let mut navigator: Option<PageNavigator> = None;

    // --- 1. Initialization Phase ---
    if !init_connection(
        &mut sender,
        &mut receiver,
        &app_state,
        &mut manager,
        &mut navigator,
        user_id,
    )
    .await
    {
        return;
    }

    // --- 2. Main Message Loop ---
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text_message(
                        text.to_string(),
                        &app_state,
                        &mut manager,
                        &mut navigator,
                        &mut sender,
                    )
                    .await;
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    info!("WebSocket connection closed.");
}

/// Sends a serialized `ServerMessage`; returns false when the socket is gone.
async fn send_message(sender: &mut WsSender, message: &ServerMessage) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            return false;
        }
    };
    sender.send(Message::Text(json.into())).await.is_ok()
}

/// Runs the init handshake: the first text message must be one of the three
/// init variants. Returns false when the connection should close.
async fn init_connection(
    sender: &mut WsSender,
    receiver: &mut WsReceiver,
    app_state: &Arc<AppState>,
    manager: &mut SessionManager,
    navigator: &mut Option<PageNavigator>,
    user_id: Uuid,
) -> bool {
    let Some(Ok(Message::Text(init_json))) = receiver.next().await else {
        error!("Client disconnected before sending an init message.");
        return false;
    };

    let init_msg = match serde_json::from_str::<ClientMessage>(&init_json) {
        Ok(msg) => msg,
        Err(e) => {
            error!("First message was not a valid init message: {}", e);
            return false;
        }
    };

    match init_msg {
        ClientMessage::Init { document_id, model } => {
            info!("Initializing fresh session for document: {}", document_id);
            let document = match app_state.store.fetch_document(document_id).await {
                Ok(document) => document,
                Err(e) => {
                    error!("Failed to load document {}: {:?}", document_id, e);
                    let msg = ServerMessage::Error {
                        message: "Failed to load the requested document.".to_string(),
                    };
                    send_message(sender, &msg).await;
                    return false;
                }
            };
            if document.owner_id != user_id {
                error!("Document {} does not belong to user {}", document_id, user_id);
                let msg = ServerMessage::Error {
                    message: "Unauthorized: Document does not belong to this user.".to_string(),
                };
                send_message(sender, &msg).await;
                return false;
            }

            let page_count = document.page_count;
            manager.set_document(document);
            manager.set_model(model);
            if let Err(e) = manager.create_for_document(user_id).await {
                error!("Failed to create session: {:?}", e);
                let msg = ServerMessage::Error { message: e.to_string() };
                send_message(sender, &msg).await;
                return false;
            }
            *navigator = Some(PageNavigator::new(page_count));
        }
        ClientMessage::InitResume { session_id } => {
            info!("Resuming session: {}", session_id);
            if let Err(e) = manager.resume(session_id).await {
                error!("Failed to resume session {}: {:?}", session_id, e);
                let msg = ServerMessage::Error { message: e.to_string() };
                send_message(sender, &msg).await;
                return false;
            }
            if let evidentia_core::session::SessionPhase::Active(session) = manager.phase() {
                if session.owner_id != user_id {
                    error!("Session {} does not belong to user {}", session_id, user_id);
                    let msg = ServerMessage::Error {
                        message: "Unauthorized: Session does not belong to this user.".to_string(),
                    };
                    send_message(sender, &msg).await;
                    return false;
                }
            }
            *navigator = manager.document().map(|d| PageNavigator::new(d.page_count));
            if let Err(e) = manager.refresh_saved_sessions(user_id).await {
                warn!("Could not refresh the saved-session list: {:?}", e);
            }
        }
        ClientMessage::InitShared { token } => {
            info!("Opening shared session.");
            if let Err(e) = manager.load_shared(&token).await {
                error!("Failed to open shared session: {:?}", e);
                let msg = ServerMessage::Error { message: e.to_string() };
                send_message(sender, &msg).await;
                return false;
            }
            *navigator = manager.document().map(|d| PageNavigator::new(d.page_count));
        }
        _ => {
            error!("First message was not an init variant.");
            return false;
        }
    }

    let init_reply = ServerMessage::SessionInitialized {
        title: manager.title().to_string(),
        page_count: manager.document().map(|d| d.page_count),
        read_only: manager.is_read_only(),
    };
    if !send_message(sender, &init_reply).await {
        error!("Failed to send session initialized message.");
        return false;
    }
    if !send_message(sender, &transcript_snapshot(manager.transcript())).await {
        return false;
    }
    if !manager.is_read_only() {
        let sessions = manager
            .saved_sessions()
            .iter()
            .map(SessionSummaryView::from_domain)
            .collect();
        if !send_message(sender, &ServerMessage::SavedSessions { sessions }).await {
            return false;
        }
    }
    true
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message(
    text: String,
    app_state: &Arc<AppState>,
    manager: &mut SessionManager,
    navigator: &mut Option<PageNavigator>,
    sender: &mut WsSender,
) {
    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(client_msg) => match client_msg {
            ClientMessage::Ask { question } => {
                run_analysis(manager, sender, &question, QueryKind::Custom).await;
            }
            ClientMessage::Template { key } => match template_prompt(&key) {
                Some(prompt) => {
                    let prompt = prompt.to_string();
                    run_analysis(manager, sender, &prompt, QueryKind::Template(key)).await;
                }
                None => {
                    warn!("Unknown analysis template requested: {}", key);
                    let msg = ServerMessage::Error {
                        message: format!("Unknown analysis template: {}", key),
                    };
                    send_message(sender, &msg).await;
                }
            },
            ClientMessage::GoToPage { page } => {
                let Some(nav) = navigator.as_mut() else {
                    debug!("Page navigation ignored: no document is open.");
                    return;
                };
                if let Some(page) = nav.go_to(page) {
                    send_message(sender, &ServerMessage::PageChanged { page }).await;
                }
            }
            ClientMessage::ActivateCitation { message_id, citation } => {
                let Some(nav) = navigator.as_mut() else {
                    debug!("Citation activation ignored: no document is open.");
                    return;
                };
                let target = manager
                    .transcript()
                    .messages()
                    .iter()
                    .find(|m| m.id == message_id)
                    .and_then(|m| m.body.as_ref())
                    .and_then(|body| body.registry.get(citation));
                match target {
                    Some(reference) => {
                        if let Some(page) = nav.activate(reference) {
                            send_message(sender, &ServerMessage::PageChanged { page }).await;
                        }
                    }
                    None => {
                        warn!(
                            "Citation activation for unknown message {} / index {}",
                            message_id, citation
                        );
                    }
                }
            }
            ClientMessage::RequestShareLink => match manager.ensure_share_token().await {
                Ok(token) => {
                    let url = share_url(&app_state.config.public_origin, &token);
                    send_message(sender, &ServerMessage::ShareLink { url }).await;
                }
                Err(e) => {
                    let msg = ServerMessage::Error { message: e.to_string() };
                    send_message(sender, &msg).await;
                }
            },
            ClientMessage::Init { .. }
            | ClientMessage::InitResume { .. }
            | ClientMessage::InitShared { .. } => {
                warn!("Received subsequent init message, which is ignored.");
            }
        },
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
        }
    }
}

/// Runs one question through the analysis provider, sending start/end signals
/// and a transcript snapshot whenever the transcript actually changed.
async fn run_analysis(
    manager: &mut SessionManager,
    sender: &mut WsSender,
    question: &str,
    kind: QueryKind,
) {
    let before = manager.transcript().revision();
    send_message(sender, &ServerMessage::AnalysisStarted).await;
    match manager.ask(question, kind).await {
        Ok(()) => {
            if manager.transcript().revision() != before {
                send_message(sender, &transcript_snapshot(manager.transcript())).await;
            }
        }
        Err(e @ SessionError::ReadOnly) => {
            let msg = ServerMessage::Error { message: e.to_string() };
            send_message(sender, &msg).await;
        }
        Err(e) => {
            error!("Analysis request failed: {:?}", e);
            let msg = ServerMessage::Error { message: e.to_string() };
            send_message(sender, &msg).await;
        }
    }
    send_message(sender, &ServerMessage::AnalysisEnded).await;
}
