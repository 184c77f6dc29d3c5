//! Outbound GitHub API calls
//!
//! One upstream request per fetch; batch fetches fan out concurrently
//! and fail as a whole. Identifiers are validated before anything
//! touches the network.

use serde::de::DeserializeOwned;
use url::Url;

use super::models::{ActivityEntry, ContributorSummary, RawEvent, RepoSummary, UserSummary};
use crate::config::GitHubConfig;
use crate::error::AppError;

/// Client for the GitHub REST API
///
/// Holds a shared reqwest client with a bounded per-call timeout.
/// Cheap to clone behind `Arc` in `AppState`.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// Returns `Config` if the API base URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &GitHubConfig) -> Result<Self, AppError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| AppError::Config(format!("github.api_base: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("hubview/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("http client: {e}")))?;

        Ok(Self {
            http,
            api_base,
            token: config.token.clone(),
        })
    }

    /// Fetch a single user's profile summary
    pub async fn fetch_user(&self, username: &str) -> Result<UserSummary, AppError> {
        validate(username)?;
        self.get_json(&format!("users/{username}"), &format!("User {username}"))
            .await
    }

    /// Fetch profile summaries for several users at once
    ///
    /// Every name is validated before the first request is issued;
    /// one invalid name fails the whole batch with `InvalidIdentifier`.
    /// The upstream calls run concurrently and any single failure
    /// fails the batch. Results come back in input order.
    pub async fn fetch_users(&self, usernames: &[String]) -> Result<Vec<UserSummary>, AppError> {
        for username in usernames {
            validate(username)?;
        }

        futures::future::try_join_all(usernames.iter().map(|username| self.fetch_user(username)))
            .await
    }

    /// Fetch a user's repositories
    pub async fn fetch_repos(&self, username: &str) -> Result<Vec<RepoSummary>, AppError> {
        validate(username)?;
        self.get_json(
            &format!("users/{username}/repos"),
            &format!("User {username}"),
        )
        .await
    }

    /// Fetch contributors for a repository
    pub async fn fetch_contributors(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<ContributorSummary>, AppError> {
        validate(owner)?;
        validate(repo)?;
        self.get_json(
            &format!("repos/{owner}/{repo}/contributors"),
            &format!("Repository {owner}/{repo}"),
        )
        .await
    }

    /// Fetch a user's recent public activity
    pub async fn fetch_user_events(&self, username: &str) -> Result<Vec<ActivityEntry>, AppError> {
        validate(username)?;
        let events: Vec<RawEvent> = self
            .get_json(
                &format!("users/{username}/events"),
                &format!("User {username}"),
            )
            .await?;

        Ok(events.into_iter().map(ActivityEntry::from).collect())
    }

    /// Issue one GET and decode the JSON body.
    ///
    /// A 404 becomes `NotFound(resource)`; any other failure mode
    /// (connect error, timeout, non-2xx, undecodable body) becomes
    /// `Upstream` so the route boundary renders a 500.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
    ) -> Result<T, AppError> {
        let url = self
            .api_base
            .join(path)
            .map_err(|e| AppError::Upstream(format!("bad request path {path}: {e}")))?;

        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {url}: {e}")))?;

        match response.status() {
            status if status == reqwest::StatusCode::NOT_FOUND => {
                Err(AppError::NotFound(resource.to_string()))
            }
            status if !status.is_success() => {
                Err(AppError::Upstream(format!("GET {url}: status {status}")))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|e| AppError::Upstream(format!("GET {url}: body: {e}"))),
        }
    }
}

fn validate(identifier: &str) -> Result<(), AppError> {
    if super::is_valid_username(identifier) {
        Ok(())
    } else {
        Err(AppError::InvalidIdentifier(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GitHubClient {
        // Unroutable base; validation failures must return before any
        // connection is attempted.
        GitHubClient::new(&GitHubConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
            token: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn batch_rejects_invalid_name_before_network() {
        let client = test_client();
        let names = vec!["a".to_string(), "bad username!".to_string()];

        let error = client.fetch_users(&names).await.unwrap_err();
        assert!(matches!(
            error,
            AppError::InvalidIdentifier(name) if name == "bad username!"
        ));
    }

    #[tokio::test]
    async fn fetch_repos_rejects_invalid_name() {
        let client = test_client();

        let error = client.fetch_repos("-nope").await.unwrap_err();
        assert!(matches!(error, AppError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn fetch_contributors_validates_both_segments() {
        let client = test_client();

        let error = client.fetch_contributors("owner", "re po").await.unwrap_err();
        assert!(matches!(
            error,
            AppError::InvalidIdentifier(name) if name == "re po"
        ));
    }

    #[tokio::test]
    async fn unreachable_upstream_maps_to_upstream_error() {
        let client = test_client();

        let error = client.fetch_user("ada").await.unwrap_err();
        assert!(matches!(error, AppError::Upstream(_)));
    }
}
