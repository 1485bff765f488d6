//! The persistence collaborator used by the authoring session and the
//! progress tracker, and its PostgreSQL implementation on [`ModelManager`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::course::{CourseDetails, Lesson, content_to_json};
use crate::model::entity::{
    CourseCreate, CourseEntity, CoursePublish, CourseSummaryRow, EnrollmentCreate,
    EnrollmentEntity, LessonCreate, LessonEntity,
};
use crate::model::{CrudRepository, DatabaseError, DatabaseResult, ModelManager, ResourceType};
use crate::progress::{Enrollment, ProgressMap};

/// A lesson row as stored. `content` is left as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: Option<Value>,
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub details: CourseDetails,
    pub lessons: Vec<LessonRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub published: bool,
    pub lessons_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields of a lesson insert.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonDraft {
    pub title: String,
    pub content: Value,
    pub order_index: i32,
}

impl From<&Lesson> for LessonDraft {
    fn from(lesson: &Lesson) -> Self {
        Self {
            title: lesson.title.clone(),
            content: content_to_json(&lesson.content),
            order_index: lesson.order_index,
        }
    }
}

/// Partial lesson update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonChanges {
    pub title: Option<String>,
    pub content: Option<Value>,
    pub order_index: Option<i32>,
}

impl From<&Lesson> for LessonChanges {
    fn from(lesson: &Lesson) -> Self {
        Self {
            // an empty title never overwrites the stored one
            title: Some(lesson.title.clone()).filter(|t| !t.is_empty()),
            content: Some(content_to_json(&lesson.content)),
            order_index: Some(lesson.order_index),
        }
    }
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn fetch_course(&self, course_id: Uuid) -> DatabaseResult<CourseRecord>;

    async fn create_course(
        &self,
        details: &CourseDetails,
        instructor_id: Uuid,
    ) -> DatabaseResult<Uuid>;

    async fn update_course_published(&self, course_id: Uuid, published: bool)
    -> DatabaseResult<()>;

    async fn list_courses_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> DatabaseResult<Vec<CourseSummary>>;

    async fn create_lesson(&self, course_id: Uuid, lesson: &LessonDraft)
    -> DatabaseResult<LessonRecord>;

    async fn update_lesson(
        &self,
        lesson_id: Uuid,
        changes: &LessonChanges,
    ) -> DatabaseResult<LessonRecord>;

    async fn fetch_enrollment(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> DatabaseResult<Option<Enrollment>>;

    async fn create_enrollment(&self, course_id: Uuid, student_id: Uuid)
    -> DatabaseResult<Enrollment>;

    async fn update_enrollment_progress(
        &self,
        enrollment_id: Uuid,
        progress: &ProgressMap,
    ) -> DatabaseResult<Enrollment>;
}

#[async_trait]
impl CourseStore for ModelManager {
    #[tracing::instrument(skip(self))]
    async fn fetch_course(&self, course_id: Uuid) -> DatabaseResult<CourseRecord> {
        self.timed(async {
            let course = CourseEntity::find_by_id(self, course_id)
                .await?
                .ok_or(DatabaseError::not_found(ResourceType::Course))?;
            let lessons = LessonEntity::all_by_course(self, course_id).await?;

            Ok(CourseRecord {
                id: course.id(),
                instructor_id: course.instructor_id(),
                details: course.details(),
                lessons: lessons.into_iter().map(LessonRecord::from).collect(),
            })
        })
        .await
    }

    #[tracing::instrument(skip(self, details))]
    async fn create_course(
        &self,
        details: &CourseDetails,
        instructor_id: Uuid,
    ) -> DatabaseResult<Uuid> {
        let data = CourseCreate {
            instructor_id,
            details: details.clone(),
        };
        let created = self.timed(CourseEntity::create(self, data)).await?;
        tracing::debug!("course created with id {}", created.id());
        Ok(created.id())
    }

    #[tracing::instrument(skip(self))]
    async fn update_course_published(
        &self,
        course_id: Uuid,
        published: bool,
    ) -> DatabaseResult<()> {
        self.timed(CourseEntity::update(self, course_id, CoursePublish { published }))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_courses_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> DatabaseResult<Vec<CourseSummary>> {
        let rows = self
            .timed(CourseSummaryRow::all_by_instructor(self, instructor_id))
            .await?;
        Ok(rows.into_iter().map(CourseSummary::from).collect())
    }

    #[tracing::instrument(skip(self, lesson))]
    async fn create_lesson(
        &self,
        course_id: Uuid,
        lesson: &LessonDraft,
    ) -> DatabaseResult<LessonRecord> {
        let data = LessonCreate {
            course_id,
            title: lesson.title.clone(),
            content: lesson.content.clone(),
            order_index: lesson.order_index,
        };
        let created = self.timed(LessonEntity::create(self, data)).await?;
        Ok(created.into())
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update_lesson(
        &self,
        lesson_id: Uuid,
        changes: &LessonChanges,
    ) -> DatabaseResult<LessonRecord> {
        let updated = self
            .timed(LessonEntity::update(self, lesson_id, changes.clone()))
            .await?;
        Ok(updated.into())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_enrollment(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> DatabaseResult<Option<Enrollment>> {
        let found = self
            .timed(EnrollmentEntity::find_by_course_and_student(
                self, course_id, student_id,
            ))
            .await?;
        Ok(found.map(Enrollment::from))
    }

    #[tracing::instrument(skip(self))]
    async fn create_enrollment(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> DatabaseResult<Enrollment> {
        let data = EnrollmentCreate {
            course_id,
            student_id,
        };
        let created = self.timed(EnrollmentEntity::create(self, data)).await?;
        Ok(created.into())
    }

    #[tracing::instrument(skip(self, progress))]
    async fn update_enrollment_progress(
        &self,
        enrollment_id: Uuid,
        progress: &ProgressMap,
    ) -> DatabaseResult<Enrollment> {
        let updated = self
            .timed(EnrollmentEntity::update(self, enrollment_id, progress.clone()))
            .await?;
        Ok(updated.into())
    }
}
