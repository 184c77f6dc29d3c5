//! Local and federated credential verification
//!
//! Wraps the credential store with bcrypt hashing. Unknown-user and
//! wrong-password failures are indistinguishable to callers.

use rand::Rng;
use std::sync::Arc;

use crate::error::AppError;
use crate::github::is_valid_username;
use crate::store::{CredentialStore, Identity};

/// An externally verified profile from the OAuth provider
///
/// By the time this exists the provider has already authenticated the
/// user; it maps onto an Identity without touching the password path.
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    /// Provider-scoped stable subject identifier
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl FederatedProfile {
    /// Derive the local username for this profile.
    ///
    /// Deterministic per subject so repeat logins resolve the same
    /// identity. The "g" prefix plus a numeric subject keeps it inside
    /// the username grammar and out of the way of normal signups.
    pub fn local_username(&self) -> String {
        let mut username = String::from("g");
        username.extend(
            self.subject
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(38),
        );
        username
    }
}

/// Signup and login over a pluggable credential store
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    cost: u32,
}

impl AuthService {
    /// Work factor used outside tests; bcrypt's default (12)
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_cost(store, Self::DEFAULT_COST)
    }

    /// Lower-cost construction for tests; production callers use `new`
    pub fn with_cost(store: Arc<dyn CredentialStore>, cost: u32) -> Self {
        Self { store, cost }
    }

    /// Register a new identity.
    ///
    /// The plaintext is hashed and dropped; it is never persisted or
    /// logged. Uniqueness is the store's atomic guarantee.
    pub async fn signup(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        if !is_valid_username(username) {
            return Err(AppError::Validation(
                "Username must be 1-39 letters, digits, or inner hyphens".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password must not be empty".to_string()));
        }

        let password_hash = hash_password(password.to_string(), self.cost).await?;
        self.store.create(username, &password_hash).await
    }

    /// Verify a credential pair against the store.
    ///
    /// Both unknown usernames and wrong passwords map to
    /// `InvalidCredentials`; the unknown-user path burns the same
    /// bcrypt work so the two are not timing-distinguishable either.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        match self.store.find_by_username(username).await? {
            Some(identity) => {
                let matches =
                    verify_password(password.to_string(), identity.password_hash.clone()).await?;
                if matches {
                    Ok(identity)
                } else {
                    Err(AppError::InvalidCredentials)
                }
            }
            None => {
                let _ = hash_password(password.to_string(), self.cost).await;
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Map a verified federated profile to an Identity.
    ///
    /// First login creates the identity with an unusable random
    /// password hash, so the local login path can never match it.
    /// A lost race against a concurrent first login resolves to the
    /// winner's record.
    pub async fn federated_login(&self, profile: &FederatedProfile) -> Result<Identity, AppError> {
        let username = profile.local_username();

        if let Some(identity) = self.store.find_by_username(&username).await? {
            return Ok(identity);
        }

        let unusable: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let password_hash = hash_password(unusable, self.cost).await?;

        match self.store.create(&username, &password_hash).await {
            Ok(identity) => Ok(identity),
            Err(AppError::DuplicateUsername) => self
                .store
                .find_by_username(&username)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "federated identity vanished after duplicate create"
                    ))
                }),
            Err(e) => Err(e),
        }
    }
}

// bcrypt is deliberately slow; keep it off the async worker threads.
async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hash: {e}")))
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password verify: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    // Minimum bcrypt cost keeps the suite fast.
    fn service() -> AuthService {
        AuthService::with_cost(Arc::new(MemoryStore::new()), 4)
    }

    #[tokio::test]
    async fn signup_then_authenticate_succeeds() {
        let service = service();
        service.signup("alice", "pw").await.unwrap();

        let identity = service.authenticate("alice", "pw").await.unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn signup_never_stores_plaintext() {
        let service = service();
        let identity = service.signup("alice", "pw").await.unwrap();

        assert_ne!(identity.password_hash, "pw");
        assert!(identity.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn duplicate_signup_fails_and_keeps_first_hash() {
        let store = Arc::new(MemoryStore::new());
        let service = AuthService::with_cost(store.clone(), 4);

        service.signup("alice", "pw").await.unwrap();
        let first = store.find_by_username("alice").await.unwrap().unwrap();

        let error = service.signup("alice", "pw2").await.unwrap_err();
        assert!(matches!(error, AppError::DuplicateUsername));

        let kept = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(kept.password_hash, first.password_hash);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let service = service();
        service.signup("alice", "pw").await.unwrap();

        let wrong_password = service.authenticate("alice", "wrong").await.unwrap_err();
        let unknown_user = service.authenticate("bob", "pw").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn signup_rejects_invalid_username() {
        let service = service();

        let error = service.signup("bad name!", "pw").await.unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn federated_login_is_stable_across_calls() {
        let service = service();
        let profile = FederatedProfile {
            subject: "108256349".to_string(),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada".to_string()),
        };

        let first = service.federated_login(&profile).await.unwrap();
        let second = service.federated_login(&profile).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.username, "g108256349");
    }

    #[tokio::test]
    async fn federated_identity_cannot_log_in_locally() {
        let service = service();
        let profile = FederatedProfile {
            subject: "108256349".to_string(),
            email: None,
            name: None,
        };
        let identity = service.federated_login(&profile).await.unwrap();

        let error = service
            .authenticate(&identity.username, "anything")
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::InvalidCredentials));
    }
}
