//! Common test utilities for E2E tests

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use hubview::{AppState, auth, config};

/// Test server instance
///
/// Runs the real router against a memory credential store, with the
/// GitHub API and the Google OAuth provider replaced by local mocks.
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        let github_base = spawn_mock_github().await;
        let google_base = spawn_mock_google().await;

        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
            },
            github: config::GitHubConfig {
                api_base: github_base,
                timeout_seconds: 5,
                token: None,
            },
            store: config::StoreConfig {
                backend: config::StoreBackend::Memory,
                path: std::path::PathBuf::from("unused.db"),
            },
            auth: config::AuthConfig {
                session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                session_max_age: 604_800,
                google: config::GoogleOAuthConfig {
                    client_id: "test-client-id".to_string(),
                    client_secret: "test-client-secret".to_string(),
                    auth_url: format!("{google_base}/auth"),
                    token_url: format!("{google_base}/token"),
                    userinfo_url: format!("{google_base}/userinfo"),
                },
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state; drop the bcrypt cost so the suite stays fast
        let mut state = AppState::new(config).await.unwrap();
        state.auth = std::sync::Arc::new(auth::AuthService::with_cost(state.store.clone(), 4));

        // Create HTTP client that does not follow redirects, so tests
        // can assert on them
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = hubview::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register a user directly through the auth service
    pub async fn create_user(&self, username: &str, password: &str) -> hubview::store::Identity {
        self.state.auth.signup(username, password).await.unwrap()
    }

    /// Create a signed session cookie value for an identity
    pub fn session_cookie_for(&self, identity_id: &str) -> String {
        let session = auth::Session::for_identity(identity_id, 3600);
        let token =
            auth::create_session_token(&session, &self.state.config.auth.session_secret).unwrap();
        format!("session={token}")
    }

    /// Log in through the HTTP surface and return the session cookie
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 303, "login should redirect");

        let set_cookie = response
            .headers()
            .get("set-cookie")
            .expect("login must set the session cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

/// Spawn a mock GitHub API and return its base URL
///
/// Conventions: any user named "ghost" (and repo "missing") is a 404,
/// "flaky" is a 500, everything else gets canned data.
async fn spawn_mock_github() -> String {
    let app = Router::new()
        .route("/users/:username", get(mock_user))
        .route("/users/:username/repos", get(mock_repos))
        .route("/users/:username/events", get(mock_events))
        .route("/repos/:owner/:repo/contributors", get(mock_contributors));

    spawn(app).await
}

async fn mock_user(Path(username): Path<String>) -> axum::response::Response {
    match username.as_str() {
        "ghost" => StatusCode::NOT_FOUND.into_response(),
        "flaky" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({
            "login": username,
            "name": "Ada",
            "followers": 5,
            "following": 2,
        }))
        .into_response(),
    }
}

async fn mock_repos(Path(username): Path<String>) -> axum::response::Response {
    match username.as_str() {
        "ghost" => StatusCode::NOT_FOUND.into_response(),
        "flaky" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!([
            {
                "name": "engine",
                "description": "A difference engine",
                "stargazers_count": 42,
                "forks_count": 7,
            },
            {
                "name": "notes",
                "description": null,
                "stargazers_count": 1,
                "forks_count": 0,
            },
        ]))
        .into_response(),
    }
}

async fn mock_contributors(Path((_owner, repo)): Path<(String, String)>) -> axum::response::Response {
    match repo.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "flaky" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!([
            { "login": "ada", "contributions": 120 },
            { "login": "grace", "contributions": 64 },
        ]))
        .into_response(),
    }
}

async fn mock_events(Path(_username): Path<String>) -> axum::response::Response {
    Json(json!([
        {
            "type": "IssuesEvent",
            "repo": { "name": "ada/engine" },
            "payload": { "title": "Fix the mill" },
        },
        {
            "type": "PushEvent",
            "repo": { "name": "ada/engine" },
            "payload": { "commits": [ { "message": "Add punch cards" } ] },
        },
        {
            "type": "WatchEvent",
            "repo": { "name": "grace/compiler" },
            "payload": {},
        },
    ]))
    .into_response()
}

/// Spawn a mock Google OAuth provider and return its base URL
async fn spawn_mock_google() -> String {
    let app = Router::new()
        .route("/token", post(mock_token))
        .route("/userinfo", get(mock_userinfo));

    spawn(app).await
}

async fn mock_token() -> Json<serde_json::Value> {
    Json(json!({
        "access_token": "mock-access-token",
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
}

async fn mock_userinfo() -> Json<serde_json::Value> {
    Json(json!({
        "sub": "108256349",
        "email": "ada@example.com",
        "name": "Ada",
    }))
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
