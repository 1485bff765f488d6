use async_trait::async_trait;
use serde_json::Value;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::repo::ResourceTyped;
use crate::model::{
    DatabaseError, ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository,
};
use crate::progress::{Enrollment, ProgressMap, progress_from_json};

#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentEntity {
    id: Uuid,
    course_id: Uuid,
    student_id: Uuid,
    progress_json: Option<Value>,
}

impl ResourceTyped for EnrollmentEntity {
    fn get_resource_type() -> ResourceType {
        ResourceType::Enrollment
    }
}

impl From<EnrollmentEntity> for Enrollment {
    fn from(entity: EnrollmentEntity) -> Self {
        Enrollment::new(
            entity.id,
            entity.course_id,
            entity.student_id,
            progress_from_json(entity.progress_json.as_ref()),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnrollmentCreate {
    pub course_id: Uuid,
    pub student_id: Uuid,
}

#[async_trait]
impl CrudRepository<EnrollmentEntity, EnrollmentCreate, ProgressMap, Uuid> for EnrollmentEntity {
    async fn create(mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            r#"
            INSERT INTO enrollments (id, course_id, student_id, progress_json)
            VALUES ($1, $2, $3, '{}'::jsonb)
            RETURNING id, course_id, student_id, progress_json
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(data.student_id)
        .fetch_one(mm.executor())
        .await;

        match result {
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DatabaseError::conflict(Self::get_resource_type()))
            }
            other => Ok(other?),
        }
    }

    async fn update(mm: &ModelManager, id: Uuid, data: ProgressMap) -> DatabaseResult<Self> {
        let progress = serde_json::to_value(&data)?;
        let updated = sqlx::query_as(
            r#"
            UPDATE enrollments SET progress_json = $1
            WHERE id = $2
            RETURNING id, course_id, student_id, progress_json
            "#,
        )
        .bind(progress)
        .bind(id)
        .fetch_optional(mm.executor())
        .await?;

        updated.ok_or(DatabaseError::not_found(Self::get_resource_type()))
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT id, course_id, student_id, progress_json FROM enrollments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}

impl EnrollmentEntity {
    pub async fn find_by_course_and_student(
        mm: &ModelManager,
        course_id: Uuid,
        student_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT id, course_id, student_id, progress_json
            FROM enrollments
            WHERE course_id = $1 AND student_id = $2
            "#,
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}
