//! Document credential store
//!
//! Identities as JSON documents in a SQLite-backed collection. A
//! unique expression index over the extracted username gives the same
//! atomic insert guarantee as the relational backend.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use super::{CredentialStore, Identity};
use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS identity_docs (
    id  TEXT PRIMARY KEY,
    doc TEXT NOT NULL
)
"#;

const USERNAME_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS identity_docs_username
ON identity_docs (json_extract(doc, '$.username'))
"#;

/// Document-model store over SQLite's JSON functions
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Open (creating if missing) the collection file
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::Config(format!("store.path: {e}")))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        Self::from_options(options, 5).await
    }

    /// Open an in-memory collection (tests)
    ///
    /// A single connection, since every in-memory connection is its
    /// own database.
    pub async fn connect_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(AppError::Database)?;
        Self::from_options(options, 1).await
    }

    async fn from_options(options: SqliteConnectOptions, max_connections: u32) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        sqlx::query(USERNAME_INDEX).execute(&pool).await?;

        Ok(Self { pool })
    }

    async fn fetch_doc(&self, sql: &str, bind: &str) -> Result<Option<Identity>, AppError> {
        let row = sqlx::query(sql).bind(bind).fetch_optional(&self.pool).await?;

        row.map(|row| {
            let doc: String = row.get("doc");
            serde_json::from_str(&doc)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt identity doc: {e}")))
        })
        .transpose()
    }
}

#[async_trait::async_trait]
impl CredentialStore for DocumentStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        self.fetch_doc(
            "SELECT doc FROM identity_docs WHERE json_extract(doc, '$.username') = ?",
            username,
        )
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, AppError> {
        self.fetch_doc("SELECT doc FROM identity_docs WHERE id = ?", id)
            .await
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Identity, AppError> {
        let identity = Identity::new(username, password_hash);
        let doc = serde_json::to_string(&identity)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("encode identity doc: {e}")))?;

        let result = sqlx::query("INSERT INTO identity_docs (id, doc) VALUES (?, ?)")
            .bind(&identity.id)
            .bind(&doc)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(identity),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }
}
