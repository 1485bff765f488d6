use async_trait::async_trait;
use serde_json::Value;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{
    DatabaseError, LessonChanges, LessonRecord, ModelManager, ResourceType,
    error::DatabaseResult, repo::CrudRepository,
};

#[derive(Debug, Clone, FromRow)]
pub struct LessonEntity {
    id: Uuid,
    course_id: Uuid,
    title: String,
    content: Option<Value>,
    order_index: i32,
}

impl ResourceTyped for LessonEntity {
    fn get_resource_type() -> ResourceType {
        ResourceType::Lesson
    }
}

impl From<LessonEntity> for LessonRecord {
    fn from(entity: LessonEntity) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            title: entity.title,
            content: entity.content,
            order_index: entity.order_index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LessonCreate {
    pub course_id: Uuid,
    pub title: String,
    pub content: Value,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<LessonEntity, LessonCreate, LessonChanges, Uuid> for LessonEntity {
    async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        let created = sqlx::query_as(
            r#"
            INSERT INTO lessons (id, course_id, title, content, order_index)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, course_id, title, content, order_index
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.order_index)
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(mm: &ModelManager, id: Uuid, data: LessonChanges) -> DatabaseResult<Self> {
        let updated = sqlx::query_as(
            r#"
            UPDATE lessons SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                order_index = COALESCE($3, order_index)
            WHERE id = $4
            RETURNING id, course_id, title, content, order_index
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.order_index)
        .bind(id)
        .fetch_optional(mm.executor())
        .await?;

        updated.ok_or(DatabaseError::not_found(Self::get_resource_type()))
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT id, course_id, title, content, order_index FROM lessons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}

impl LessonEntity {
    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT id, course_id, title, content, order_index
            FROM lessons
            WHERE course_id = $1
            ORDER BY order_index ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
