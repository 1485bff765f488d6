mod database;
pub use database::DbConnection;

pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult};

pub mod memory;
pub use memory::MemoryStore;

mod repo;
pub use repo::{CrudRepository, ResourceType, ResourceTyped};

mod store;
pub use store::{CourseRecord, CourseStore, CourseSummary, LessonChanges, LessonDraft, LessonRecord};

use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct ModelManager {
    database: DbConnection,
    timeout: Duration,
}

impl ModelManager {
    pub fn new(conn: DbConnection, timeout: Duration) -> Self {
        Self {
            database: conn,
            timeout,
        }
    }

    pub fn executor(&self) -> &PgPool {
        self.database.pool()
    }

    /// Bounds a single store call by the configured timeout.
    pub async fn timed<F, T>(&self, fut: F) -> DatabaseResult<T>
    where
        F: Future<Output = DatabaseResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("store call exceeded {:?}", self.timeout);
                Err(DatabaseError::Timeout)
            }
        }
    }
}
