//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::MessageView;
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use evidentia_core::domain::{Document, DocumentStatus};
use evidentia_core::session::{SessionError, SessionManager};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        upload_document_handler,
        list_sessions_handler,
        home_handler,
    ),
    components(
        schemas(UploadDocumentResponse, SessionListEntry)
    ),
    tags(
        (name = "Evidentia API", description = "API endpoints for the citation-linked document analysis chat.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload sent after successfully uploading a document.
#[derive(Serialize, ToSchema)]
pub struct UploadDocumentResponse {
    document_id: Uuid,
    filename: String,
    page_count: u32,
    status: String,
}

/// One entry in the saved-session list.
#[derive(Serialize, ToSchema)]
pub struct SessionListEntry {
    session_id: Uuid,
    name: String,
    document_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Query parameters for the home route. A `session_id` carrying a share
/// token switches the page into read-only shared mode.
#[derive(Deserialize)]
pub struct HomeParams {
    session_id: Option<String>,
}

/// The bootstrap payload for the home page.
#[derive(Serialize)]
pub struct HomeResponse {
    mode: &'static str,
    title: String,
    read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<Vec<MessageView>>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Upload a document for analysis.
///
/// Accepts a multipart/form-data request with a single file part. The file
/// is rendered into pages and stored; the returned `document_id` is what a
/// WebSocket `init` message references to start a chat session.
#[utoipa::path(
    post,
    path = "/documents",
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 201, description = "Document stored successfully", body = UploadDocumentResponse),
        (status = 400, description = "Bad request (e.g., missing file or unreadable content)"),
        (status = 401, description = "Missing or malformed x-user-id header"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn upload_document_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (filename, mime_type, data) = if let Some(field) =
        multipart.next_field().await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read multipart data: {}", e),
            )
        })? {
        let filename = field.file_name().unwrap_or("untitled.pdf").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        (filename, mime_type, data)
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    };

    let rendered = app_state.renderer.open(&data).await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Could not render the uploaded document: {}", e),
        )
    })?;

    let document = Document {
        id: None,
        owner_id: user_id,
        filename: filename.clone(),
        size_bytes: data.len() as u64,
        mime_type,
        page_count: rendered.page_count,
        full_text: rendered.full_text,
        pages: rendered.pages,
        storage_ref: format!("documents/{}", Uuid::new_v4()),
        status: DocumentStatus::Ready,
    };

    match app_state.store.insert_document(&document).await {
        Ok(document_id) => {
            let response = UploadDocumentResponse {
                document_id,
                filename,
                page_count: document.page_count,
                status: document.status.as_str().to_string(),
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            error!("Failed to store uploaded document: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store document".to_string(),
            ))
        }
    }
}

/// List the caller's saved analysis sessions, newest first.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "The caller's saved sessions", body = [SessionListEntry]),
        (status = 401, description = "Missing or malformed x-user-id header"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "The unique ID of the user.")
    )
)]
pub async fn list_sessions_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.store.list_sessions_for_owner(user_id).await {
        Ok(summaries) => {
            let entries: Vec<SessionListEntry> = summaries
                .iter()
                .map(|s| SessionListEntry {
                    session_id: s.id,
                    name: s.name.clone(),
                    document_id: s.document_id,
                    created_at: s.created_at,
                })
                .collect();
            Ok(Json(entries))
        }
        Err(e) => {
            error!("Failed to list sessions: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list sessions".to_string(),
            ))
        }
    }
}

/// The home route bootstrap.
///
/// Without parameters it reports normal mode. With `?session_id=<token>` it
/// resolves the share token and returns the shared session's title and
/// transcript for a read-only view; an unknown token yields 404.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Bootstrap payload for the page"),
        (status = 404, description = "The share token did not resolve to a session"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("session_id" = Option<String>, Query, description = "A share token identifying a shared session.")
    )
)]
pub async fn home_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<HomeParams>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let Some(token) = params.session_id else {
        return Ok(Json(HomeResponse {
            mode: "normal",
            title: "Evidentia".to_string(),
            read_only: false,
            page_count: None,
            transcript: None,
        }));
    };

    let mut manager = SessionManager::new(app_state.store.clone(), app_state.analysis.clone());
    match manager.load_shared(&token).await {
        Ok(()) => {
            let transcript = manager
                .transcript()
                .messages()
                .iter()
                .map(MessageView::from_domain)
                .collect();
            Ok(Json(HomeResponse {
                mode: "shared",
                title: manager.title().to_string(),
                read_only: true,
                page_count: manager.document().map(|d| d.page_count),
                transcript: Some(transcript),
            }))
        }
        Err(SessionError::SharedNotFound) => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "Shared session link is invalid or has expired"
            })),
        )),
        Err(e) => {
            error!("Failed to load shared session: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to load shared session" })),
            ))
        }
    }
}
