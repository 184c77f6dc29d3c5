//! Authentication extractors
//!
//! Resolve the session cookie back to a live Identity on every
//! request. A session whose identity no longer exists is treated as
//! unauthenticated.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::session::verify_session_token;
use crate::AppState;
use crate::error::AppError;
use crate::store::Identity;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

async fn authenticate_token(token: &str, state: &AppState) -> Result<Identity, AppError> {
    let session = verify_session_token(token, &state.config.auth.session_secret)?;

    // The session stores only the id; a deleted account makes the
    // session worthless even before it expires.
    state
        .store
        .find_by_id(&session.identity_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Extractor for the current authenticated identity
///
/// Rejection redirects to the login page.
///
/// # Usage
/// ```ignore
/// async fn handler(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let identity = authenticate_token(&token, &state).await?;

        Ok(CurrentUser(identity))
    }
}

/// Optional current identity extractor
///
/// Returns None if not authenticated, instead of error.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let identity = match extract_token_from_headers(&parts.headers) {
            Some(token) => authenticate_token(&token, &state).await.ok(),
            None => None,
        };

        Ok(MaybeUser(identity))
    }
}
