//! GitHub REST API client
//!
//! Handles:
//! - Identifier validation (GitHub's username grammar)
//! - Upstream fetches for users, repos, contributors, events
//! - Translation of transport/HTTP failures into the app error set

mod client;
mod models;

pub use client::GitHubClient;
pub use models::{ActivityEntry, ContributorSummary, RepoSummary, UserSummary};

/// Check a string against GitHub's username grammar.
///
/// Valid names are 1-39 characters of ASCII alphanumerics and hyphens,
/// where a hyphen is never leading, trailing, or doubled. The same
/// grammar is applied to owner and repository path segments before any
/// request leaves the process.
pub fn is_valid_username(username: &str) -> bool {
    if username.is_empty() || username.len() > 39 {
        return false;
    }

    let bytes = username.as_bytes();
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return false;
    }

    let mut prev_hyphen = false;
    for &b in bytes {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => prev_hyphen = false,
            b'-' => {
                if prev_hyphen {
                    return false;
                }
                prev_hyphen = true;
            }
            _ => return false,
        }
    }

    true
}
