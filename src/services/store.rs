use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Profile, ProfileFields, ProfileFilter, ProfileQuery};

/// Errors that can occur when reading or writing profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),
}

/// Persistence for the profile table
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Filtered, ordered and optionally paginated profiles
    async fn list(&self, query: &ProfileQuery) -> Result<Vec<Profile>, StoreError>;

    async fn count(&self, filter: &ProfileFilter) -> Result<i64, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Profile>, StoreError>;

    async fn create(&self, fields: ProfileFields) -> Result<Profile, StoreError>;

    /// Replace every column of a profile; `None` if it doesn't exist
    async fn update(&self, id: i64, fields: ProfileFields) -> Result<Option<Profile>, StoreError>;

    /// `true` if a row was deleted
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
