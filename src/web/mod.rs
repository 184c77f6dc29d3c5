//! HTTP routes
//!
//! Thin handlers: parse input, call the GitHub client or auth
//! service, hand the result to the renderer. All domain errors
//! surface as `AppError` and are converted at this boundary.

pub mod render;

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser};
use crate::error::AppError;

/// Create the page router
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/github/users", get(github_users))
        .route("/github/repos/:username", get(github_repos))
        .route(
            "/github/repos/:owner/:repo/contributors",
            get(github_contributors),
        )
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard))
}

// =============================================================================
// GitHub pages
// =============================================================================

/// GET /
async fn home(MaybeUser(identity): MaybeUser) -> Html<String> {
    let username = identity.as_ref().map(|identity| identity.username.as_str());
    Html(render::home_page(username))
}

#[derive(Debug, Deserialize)]
struct UsersQuery {
    usernames: Option<String>,
}

/// GET /github/users?usernames=a,b,c
///
/// One upstream call per name, issued concurrently. A single invalid
/// name or failed fetch fails the whole page; there is no partial
/// rendering.
async fn github_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<Html<String>, AppError> {
    let raw = query.usernames.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter GitHub usernames.".to_string(),
        ));
    }

    let usernames: Vec<String> = raw.split(',').map(|name| name.trim().to_string()).collect();

    let users = state.github.fetch_users(&usernames).await?;
    Ok(Html(render::users_page(&users)))
}

/// GET /github/repos/:username
async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Html<String>, AppError> {
    let repos = state.github.fetch_repos(&username).await?;
    Ok(Html(render::repos_page(&username, &repos)))
}

/// GET /github/repos/:owner/:repo/contributors
async fn github_contributors(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let contributors = state.github.fetch_contributors(&owner, &repo).await?;
    Ok(Html(render::contributors_page(&contributors)))
}

// =============================================================================
// Local accounts
// =============================================================================

#[derive(Debug, Deserialize)]
struct CredentialsForm {
    username: String,
    password: String,
}

/// GET /signup
async fn signup_form() -> Html<String> {
    Html(render::signup_page(None))
}

/// POST /signup
///
/// Success redirects to the login page. A taken username (or an
/// invalid one) re-renders the form with an inline error instead of
/// losing the user to an error page.
async fn signup(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match state.auth.signup(&form.username, &form.password).await {
        Ok(identity) => {
            tracing::info!(username = %identity.username, "New signup");
            Ok(Redirect::to("/login").into_response())
        }
        Err(error @ AppError::DuplicateUsername) => Ok((
            StatusCode::CONFLICT,
            Html(render::signup_page(Some(&error.to_string()))),
        )
            .into_response()),
        Err(AppError::Validation(message)) => Ok((
            StatusCode::BAD_REQUEST,
            Html(render::signup_page(Some(&message))),
        )
            .into_response()),
        Err(error) => Err(error),
    }
}

/// GET /login
async fn login_form() -> Html<String> {
    Html(render::login_page())
}

/// POST /login
///
/// Bad credentials propagate as `InvalidCredentials`, which the error
/// boundary turns into a redirect back to the login page.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let identity = state
        .auth
        .authenticate(&form.username, &form.password)
        .await?;

    tracing::info!(username = %identity.username, "Login");
    let cookie = crate::auth::session_cookie(&state.config, &identity.id)?;

    Ok((jar.add(cookie), Redirect::to("/")))
}

/// GET /logout
///
/// Idempotent: clearing an absent session is the same redirect as
/// clearing a live one.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(crate::auth::removal_cookie()), Redirect::to("/"))
}

/// GET /dashboard
///
/// Requires an authenticated session; shows recent activity for the
/// session's own username only.
async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Html<String>, AppError> {
    let entries = state.github.fetch_user_events(&identity.username).await?;
    Ok(Html(render::dashboard_page(&identity.username, &entries)))
}
