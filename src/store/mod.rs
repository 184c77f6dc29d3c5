//! Credential storage
//!
//! One `CredentialStore` contract with three interchangeable backends
//! selected by configuration at startup. The rest of the system only
//! ever sees the trait object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::AppError;

mod document;
mod memory;
mod sqlite;

pub use document::DocumentStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A registered or federated user record
///
/// Created on signup (or first federated login); read on login and on
/// every session restore. Never updated or deleted in current scope.
/// The password hash is bcrypt output and never leaves the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    /// ULID, 26 characters
    pub id: String,
    /// Unique, case-sensitive, GitHub username grammar
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Build a fresh identity with a new ULID
    pub fn new(username: &str, password_hash: &str) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Storage contract for identities
///
/// `create` must enforce username uniqueness atomically: a unique
/// constraint or a single-lock insert, never a read followed by a
/// write across an await point.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError>;

    /// Insert a new identity, failing with `DuplicateUsername` if the
    /// username is already taken (exact, case-sensitive match).
    async fn create(&self, username: &str, password_hash: &str) -> Result<Identity, AppError>;
}

/// Open the backend named by configuration
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn CredentialStore>, AppError> {
    let store: Arc<dyn CredentialStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::connect(&config.path).await?),
        StoreBackend::Document => Arc::new(DocumentStore::connect(&config.path).await?),
    };

    tracing::info!(backend = ?config.backend, "Credential store ready");
    Ok(store)
}
