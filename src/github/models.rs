//! Summary shapes derived from GitHub API responses
//!
//! These are recomputed per request and never persisted.

use serde::{Deserialize, Serialize};

/// Profile summary from `GET /users/{username}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: Option<String>,
    pub followers: u64,
    pub following: u64,
}

/// Repository summary from `GET /users/{username}/repos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    #[serde(rename = "forks_count")]
    pub forks: u64,
}

/// Contributor summary from `GET /repos/{owner}/{repo}/contributors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorSummary {
    #[serde(rename = "login")]
    pub username: String,
    pub contributions: u64,
}

/// One entry in a user's recent activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Event type, e.g. "PushEvent"
    pub kind: String,
    /// Repository the event happened in, "owner/name" form
    pub repo: String,
    /// Human-readable title for the event
    pub title: String,
}

/// Shown when an event carries neither a payload title nor a commit
pub const UNTITLED_EVENT: &str = "(no title)";

/// Raw event shape from `GET /users/{username}/events`
///
/// Only the fields the activity feed reads are modeled; everything
/// else in the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: RawEventRepo,
    #[serde(default)]
    pub payload: RawEventPayload,
}

#[derive(Debug, Deserialize)]
pub struct RawEventRepo {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEventPayload {
    pub title: Option<String>,
    #[serde(default)]
    pub commits: Vec<RawCommit>,
}

#[derive(Debug, Deserialize)]
pub struct RawCommit {
    pub message: String,
}

impl From<RawEvent> for ActivityEntry {
    /// Derive the display entry from a raw event.
    ///
    /// Title preference: payload title, then the first commit message.
    /// Events carrying neither get a placeholder rather than failing
    /// the whole feed.
    fn from(event: RawEvent) -> Self {
        let title = event
            .payload
            .title
            .or_else(|| {
                event
                    .payload
                    .commits
                    .into_iter()
                    .next()
                    .map(|commit| commit.message)
            })
            .unwrap_or_else(|| UNTITLED_EVENT.to_string());

        Self {
            kind: event.kind,
            repo: event.repo.name,
            title,
        }
    }
}
