mod config;
mod errors;
mod handlers;
mod llm;
mod middleware;
mod models;
mod runner;
mod services;

use anyhow::Context;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::{config::Config, llm::ModelClient, services::UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    let config_state = config.clone();

    // Account store, read once at startup
    let user_store =
        UserStore::load(config.store.path.as_str()).context("Failed to load user store")?;

    // Shared HTTP client for the model API; carries the request deadline
    let model_client =
        ModelClient::new(config.model.clone()).context("Failed to build model client")?;

    // Session store setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    // Create router with all routes
    let app = Router::new()
        // Auth routes
        .route("/", get(handlers::serve_login_page))
        .route("/login", post(handlers::handle_login))
        .route("/register", post(handlers::handle_register))
        .route("/logout", get(handlers::handle_logout))
        // Review routes
        .route("/review", get(handlers::serve_review_page))
        .route("/settings/api-key", post(handlers::set_api_key))
        .route("/analyze", post(handlers::handle_analyze))
        .route("/run", post(handlers::handle_run))
        .route("/analyze-run", post(handlers::handle_analyze_and_run))
        // Assistant + dashboard routes
        .route("/chat", post(handlers::handle_chat))
        .route("/user", get(handlers::serve_user_dashboard))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Add middleware
        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)
        // Pasted source can be large, but not arbitrarily so
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        // Add state
        .with_state((user_store, model_client, config_state));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.server.host, config.server.port
    ))
    .await
    .context("Failed to bind server")?;

    tracing::info!(
        "Server running on {}:{}",
        config.server.host,
        config.server.port
    );

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
