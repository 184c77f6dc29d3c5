//! Hubview - a small server-rendered GitHub profile viewer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Web Layer (Axum)                        │
//! │  - GitHub info pages                                        │
//! │  - Signup / login / dashboard pages                         │
//! │  - Google OAuth endpoints                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Service Layer                            │
//! │  - GitHub API client                                        │
//! │  - Credential verification / sessions                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Credential Store                         │
//! │  - memory / relational (SQLite) / document (SQLite JSON)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `web`: HTTP handlers and HTML rendering
//! - `github`: GitHub REST API client
//! - `auth`: sessions, local credentials, Google OAuth
//! - `store`: pluggable credential storage
//! - `config`: Configuration management
//! - `error`: Error types

pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod store;
pub mod web;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the credential store and HTTP clients.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Credential store selected by configuration at startup
    pub store: Arc<dyn store::CredentialStore>,

    /// Signup/login service over the store
    pub auth: Arc<auth::AuthService>,

    /// GitHub API client
    pub github: Arc<github::GitHubClient>,

    /// HTTP client for the OAuth provider
    pub http_client: Arc<reqwest::Client>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Open the configured credential store
    /// 2. Build the GitHub client
    /// 3. Build the OAuth HTTP client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let store = store::connect(&config.store).await?;
        let auth = Arc::new(auth::AuthService::new(store.clone()));

        let github = Arc::new(github::GitHubClient::new(&config.github)?);
        tracing::info!(api_base = %config.github.api_base, "GitHub client ready");

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("hubview/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.github.timeout_seconds))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            store,
            auth,
            github,
            http_client: Arc::new(http_client),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(web::pages_router())
        .merge(auth::oauth_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
