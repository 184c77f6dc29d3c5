//! Authentication
//!
//! Handles:
//! - Local username/password verification (bcrypt)
//! - Google OAuth flow
//! - Session cookies and extractors

mod middleware;
mod oauth;
mod service;
pub mod session;

pub use middleware::{CurrentUser, MaybeUser, SESSION_COOKIE};
pub use oauth::oauth_router;
pub use service::{AuthService, FederatedProfile};
pub use session::{Session, create_session_token, verify_session_token};

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::AppConfig;
use crate::error::AppError;

/// Build the session cookie for an identity
///
/// The expiry lives inside the signed token; the cookie itself is
/// session-scoped.
pub fn session_cookie(config: &AppConfig, identity_id: &str) -> Result<Cookie<'static>, AppError> {
    let session = Session::for_identity(identity_id, config.auth.session_max_age);
    let token = create_session_token(&session, &config.auth.session_secret)?;

    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.should_use_secure_cookies())
        .build())
}

/// Build the cookie that clears a session
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}
