//! Google OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with Google.
//! Every failure path redirects back to the home page; the federated
//! identity ends up in the same session shape as a local login.

use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::Rng;
use serde::Deserialize;
use url::Url;

use super::FederatedProfile;
use crate::AppState;
use crate::error::AppError;

/// Name of the CSRF state cookie
const STATE_COOKIE: &str = "oauth_state";

/// Create OAuth router
///
/// Routes:
/// - GET /auth/google - Redirect to Google's consent page
/// - GET /auth/google/callback - OAuth callback
pub fn oauth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/google", get(google_redirect))
        .route("/auth/google/callback", get(google_callback))
}

// =============================================================================
// Authorization redirect
// =============================================================================

/// GET /auth/google
///
/// # Steps
/// 1. Generate CSRF state token
/// 2. Store state in cookie
/// 3. Redirect to Google with client_id, redirect_uri, scope, state
async fn google_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let google = &state.config.auth.google;
    if !google.is_configured() {
        tracing::warn!("Google OAuth requested but no client credentials configured");
        return Ok((jar, Redirect::to("/")));
    }

    let csrf_state = generate_csrf_state();

    let mut url = Url::parse(&google.auth_url)
        .map_err(|e| AppError::Config(format!("auth.google.auth_url: {e}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &google.client_id)
        .append_pair("redirect_uri", &callback_url(&state))
        .append_pair("response_type", "code")
        .append_pair("scope", "openid email profile")
        .append_pair("state", &csrf_state);

    let cookie = Cookie::build((STATE_COOKIE, csrf_state))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.should_use_secure_cookies())
        .build();

    Ok((jar.add(cookie), Redirect::to(url.as_str())))
}

// =============================================================================
// Callback
// =============================================================================

/// Query parameters from the Google callback
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OpenID Connect userinfo response
#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

/// GET /auth/google/callback
///
/// # Steps
/// 1. Verify CSRF state against the state cookie
/// 2. Exchange code for access token
/// 3. Fetch userinfo from Google
/// 4. Map the profile to an Identity (created on first login)
/// 5. Create session and set cookie
/// 6. Redirect to home
///
/// Any failure clears the state cookie and redirects home.
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> impl IntoResponse {
    let expected_state = jar.get(STATE_COOKIE).map(|cookie| cookie.value().to_owned());
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/").build());

    match complete_login(&state, &query, expected_state).await {
        Ok(Some(cookie)) => (jar.add(cookie), Redirect::to("/")),
        Ok(None) => (jar, Redirect::to("/")),
        Err(error) => {
            tracing::warn!(%error, "Google OAuth callback failed");
            (jar, Redirect::to("/"))
        }
    }
}

async fn complete_login(
    state: &AppState,
    query: &CallbackQuery,
    expected_state: Option<String>,
) -> Result<Option<Cookie<'static>>, AppError> {
    if let Some(error) = &query.error {
        tracing::warn!(%error, "Google OAuth denied");
        return Ok(None);
    }

    let (Some(code), Some(returned_state)) = (&query.code, &query.state) else {
        return Ok(None);
    };

    if expected_state.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!("OAuth state mismatch; discarding callback");
        return Ok(None);
    }

    let profile = fetch_profile(state, code).await?;
    let identity = state.auth.federated_login(&profile).await?;

    tracing::info!(username = %identity.username, "Federated login");
    super::session_cookie(&state.config, &identity.id).map(Some)
}

/// Exchange the authorization code and fetch the verified profile
async fn fetch_profile(state: &AppState, code: &str) -> Result<FederatedProfile, AppError> {
    let google = &state.config.auth.google;

    let token: TokenResponse = state
        .http_client
        .post(&google.token_url)
        .form(&[
            ("code", code),
            ("client_id", google.client_id.as_str()),
            ("client_secret", google.client_secret.as_str()),
            ("redirect_uri", callback_url(state).as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("token exchange: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::Upstream(format!("token exchange: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("token exchange body: {e}")))?;

    let info: UserInfo = state
        .http_client
        .get(&google.userinfo_url)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("userinfo: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::Upstream(format!("userinfo: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("userinfo body: {e}")))?;

    Ok(FederatedProfile {
        subject: info.sub,
        email: info.email,
        name: info.name,
    })
}

fn callback_url(state: &AppState) -> String {
    format!("{}/auth/google/callback", state.config.server.base_url())
}

/// Generate a random CSRF state token
fn generate_csrf_state() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
