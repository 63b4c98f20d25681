pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use middleware::require_user;
pub use rest::{home_handler, list_sessions_handler, upload_document_handler};
pub use ws_handler::ws_handler;
