use thiserror::Error;

use crate::model::ResourceType;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("{resource_type:?} not found")]
    NotFound { resource_type: ResourceType },
    #[error("{resource_type:?} already exists")]
    Conflict { resource_type: ResourceType },
    #[error("store call timed out")]
    Timeout,
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DatabaseError {
    pub fn not_found(resource_type: ResourceType) -> Self {
        Self::NotFound { resource_type }
    }

    pub fn conflict(resource_type: ResourceType) -> Self {
        Self::Conflict { resource_type }
    }
}
