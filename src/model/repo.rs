use async_trait::async_trait;

use crate::model::{ModelManager, error::DatabaseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Course,
    Lesson,
    Enrollment,
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

#[async_trait]
pub trait CrudRepository<T, Create, Update, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(mm: &ModelManager, data: Create) -> DatabaseResult<T>;

    async fn update(mm: &ModelManager, id: V, data: Update) -> DatabaseResult<T>;

    async fn find_by_id(mm: &ModelManager, id: V) -> DatabaseResult<Option<T>>;
}
