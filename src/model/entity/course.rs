use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::course::{CourseDetails, CourseLevel};
use crate::model::repo::ResourceTyped;
use crate::model::{
    CourseSummary, DatabaseError, ModelManager, ResourceType, error::DatabaseResult,
    repo::CrudRepository,
};

#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    id: Uuid,
    instructor_id: Uuid,
    title: String,
    description: Option<String>,
    category: Option<String>,
    level: Option<String>,
    featured_image: Option<String>,
    is_published: bool,
}

impl ResourceTyped for CourseEntity {
    fn get_resource_type() -> ResourceType {
        ResourceType::Course
    }
}

impl CourseEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn instructor_id(&self) -> Uuid {
        self.instructor_id
    }

    pub fn details(&self) -> CourseDetails {
        CourseDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone().unwrap_or_default(),
            level: self.level.as_deref().and_then(CourseLevel::parse),
            featured_image: self.featured_image.clone(),
            published: self.is_published,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CourseCreate {
    pub instructor_id: Uuid,
    pub details: CourseDetails,
}

#[derive(Debug, Clone, Copy)]
pub struct CoursePublish {
    pub published: bool,
}

#[async_trait]
impl CrudRepository<CourseEntity, CourseCreate, CoursePublish, Uuid> for CourseEntity {
    async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        let details = &data.details;
        let created = sqlx::query_as(
            r#"
            INSERT INTO courses
                (id, instructor_id, title, description, category, level, featured_image, is_published, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.instructor_id)
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.category)
        .bind(details.level.map(|l| l.as_str()))
        .bind(&details.featured_image)
        .bind(details.published)
        .bind(details.status())
        .fetch_one(mm.executor())
        .await?;

        Ok(created)
    }

    async fn update(mm: &ModelManager, id: Uuid, data: CoursePublish) -> DatabaseResult<Self> {
        let status = if data.published { "published" } else { "draft" };
        let updated = sqlx::query_as(
            "UPDATE courses SET is_published = $1, status = $2 WHERE id = $3 RETURNING *",
        )
        .bind(data.published)
        .bind(status)
        .bind(id)
        .fetch_optional(mm.executor())
        .await?;

        updated.ok_or(DatabaseError::not_found(Self::get_resource_type()))
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

#[derive(Debug, sqlx::FromRow)]
pub struct CourseSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub lessons_count: i64,
}

impl From<CourseSummaryRow> for CourseSummary {
    fn from(row: CourseSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            published: row.is_published,
            lessons_count: row.lessons_count,
            created_at: row.created_at,
        }
    }
}

impl CourseSummaryRow {
    pub async fn all_by_instructor(
        mm: &ModelManager,
        instructor_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.title,
                c.is_published,
                c.created_at,
                COUNT(l.id) AS lessons_count
            FROM courses c
            LEFT JOIN lessons l ON l.course_id = c.id
            WHERE c.instructor_id = $1
            GROUP BY c.id
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(instructor_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
