//! Process-memory credential store
//!
//! Non-durable. Exists for tests and local experimentation; the
//! single lock makes check-and-insert atomic under concurrent
//! signups.

use tokio::sync::Mutex;

use super::{CredentialStore, Identity};
use crate::error::AppError;

/// In-memory list of identities behind one async lock
pub struct MemoryStore {
    identities: Mutex<Vec<Identity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            identities: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        let identities = self.identities.lock().await;
        Ok(identities
            .iter()
            .find(|identity| identity.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError> {
        let identities = self.identities.lock().await;
        Ok(identities
            .iter()
            .find(|identity| identity.id == id)
            .cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Identity, AppError> {
        // Duplicate check and insert happen under the same lock guard.
        let mut identities = self.identities.lock().await;

        if identities
            .iter()
            .any(|identity| identity.username == username)
        {
            return Err(AppError::DuplicateUsername);
        }

        let identity = Identity::new(username, password_hash);
        identities.push(identity.clone());
        Ok(identity)
    }
}
