//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        analysis::CannedAnalysisAdapter, db::DbAdapter, llm::OpenAiAnalysisAdapter,
        renderer::TextPageRenderer,
    },
    config::Config,
    error::ApiError,
    web::{
        home_handler, list_sessions_handler, middleware::require_user, rest::ApiDoc,
        state::AppState, upload_document_handler, ws_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use evidentia_core::ports::AnalysisProvider;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let renderer = Arc::new(TextPageRenderer::new(config.page_char_limit));

    let analysis: Arc<dyn AnalysisProvider> = match &config.openai_api_key {
        Some(api_key) => {
            info!("Using the OpenAI analysis backend.");
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            let openai_client = Client::with_config(openai_config);
            Arc::new(OpenAiAnalysisAdapter::new(
                openai_client,
                config.analysis_model.clone(),
            ))
        }
        None => {
            info!("No API key configured; using the canned analysis backend.");
            Arc::new(CannedAnalysisAdapter::new(Duration::from_millis(
                config.analysis_delay_ms,
            )))
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store: db_adapter,
        analysis,
        renderer,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    // Public routes (no user header required)
    let public_routes = Router::new().route("/", get(home_handler));

    // Protected routes (x-user-id header required)
    let protected_routes = Router::new()
        .route("/documents", post(upload_document_handler))
        .route("/sessions", get(list_sessions_handler))
        .route("/ws", get(ws_handler))
        .layer(axum_middleware::from_fn(require_user));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
