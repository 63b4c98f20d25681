//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use evidentia_core::ports::{AnalysisProvider, DocumentRenderer, SessionStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Per-connection session state lives in the WebSocket handler;
/// nothing here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub analysis: Arc<dyn AnalysisProvider>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub config: Arc<Config>,
}
