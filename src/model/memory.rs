//! In-process [`CourseStore`], with a call log and one-shot failure
//! injection. Used by the test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::course::CourseDetails;
use crate::model::{
    CourseRecord, CourseStore, CourseSummary, DatabaseError, DatabaseResult, LessonChanges,
    LessonDraft, LessonRecord, ResourceType,
};
use crate::progress::{Enrollment, ProgressMap};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FetchCourse(Uuid),
    CreateCourse { title: String },
    UpdateCoursePublished { course_id: Uuid, published: bool },
    ListCourses(Uuid),
    CreateLesson { course_id: Uuid, title: String, order_index: i32 },
    UpdateLesson { lesson_id: Uuid, order_index: Option<i32> },
    FetchEnrollment { course_id: Uuid, student_id: Uuid },
    CreateEnrollment { course_id: Uuid, student_id: Uuid },
    UpdateEnrollmentProgress(Uuid),
}

/// Which call should fail next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    CreateCourse,
    CreateLesson,
    UpdateLesson,
    CreateEnrollment,
    UpdateEnrollmentProgress,
}

#[derive(Debug, Default)]
struct State {
    courses: HashMap<Uuid, CourseRecord>,
    /// Creation time plus insertion sequence, for newest-first listings.
    created: HashMap<Uuid, (DateTime<Utc>, u64)>,
    enrollments: HashMap<Uuid, Enrollment>,
    calls: Vec<StoreCall>,
    fail_on: Option<FailOn>,
}

impl State {
    fn stamp_created(&mut self, course_id: Uuid) {
        let seq = self.created.len() as u64;
        self.created.entry(course_id).or_insert((Utc::now(), seq));
    }

    fn take_failure(&mut self, point: FailOn) -> DatabaseResult<()> {
        if self.fail_on == Some(point) {
            self.fail_on = None;
            return Err(DatabaseError::SqlxError(sqlx::Error::Protocol(format!(
                "injected failure on {point:?}"
            ))));
        }
        Ok(())
    }

    fn find_lesson_mut(&mut self, lesson_id: Uuid) -> Option<&mut LessonRecord> {
        self.courses
            .values_mut()
            .flat_map(|c| c.lessons.iter_mut())
            .find(|l| l.id == lesson_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a course as if it had been persisted earlier.
    pub async fn insert_course(&self, course: CourseRecord) {
        let mut state = self.state.lock().await;
        state.stamp_created(course.id);
        state.courses.insert(course.id, course);
    }

    pub async fn course(&self, course_id: Uuid) -> Option<CourseRecord> {
        self.state.lock().await.courses.get(&course_id).cloned()
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    pub async fn fail_next(&self, point: FailOn) {
        self.state.lock().await.fail_on = Some(point);
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn fetch_course(&self, course_id: Uuid) -> DatabaseResult<CourseRecord> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::FetchCourse(course_id));
        state
            .courses
            .get(&course_id)
            .cloned()
            .map(|mut course| {
                course.lessons.sort_by_key(|l| l.order_index);
                course
            })
            .ok_or(DatabaseError::not_found(ResourceType::Course))
    }

    async fn create_course(
        &self,
        details: &CourseDetails,
        instructor_id: Uuid,
    ) -> DatabaseResult<Uuid> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::CreateCourse {
            title: details.title.clone(),
        });
        state.take_failure(FailOn::CreateCourse)?;

        let id = Uuid::new_v4();
        state.stamp_created(id);
        state.courses.insert(id, CourseRecord {
            id,
            instructor_id,
            details: details.clone(),
            lessons: Vec::new(),
        });
        Ok(id)
    }

    async fn update_course_published(
        &self,
        course_id: Uuid,
        published: bool,
    ) -> DatabaseResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::UpdateCoursePublished {
            course_id,
            published,
        });
        let course = state
            .courses
            .get_mut(&course_id)
            .ok_or(DatabaseError::not_found(ResourceType::Course))?;
        course.details.published = published;
        Ok(())
    }

    async fn list_courses_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> DatabaseResult<Vec<CourseSummary>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::ListCourses(instructor_id));

        let mut courses: Vec<(&CourseRecord, (DateTime<Utc>, u64))> = state
            .courses
            .values()
            .filter(|c| c.instructor_id == instructor_id)
            .map(|c| {
                let created = state.created.get(&c.id).copied().unwrap_or_default();
                (c, created)
            })
            .collect();
        courses.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(courses
            .into_iter()
            .map(|(c, (created_at, _))| CourseSummary {
                id: c.id,
                title: c.details.title.clone(),
                published: c.details.published,
                lessons_count: c.lessons.len() as i64,
                created_at,
            })
            .collect())
    }

    async fn create_lesson(
        &self,
        course_id: Uuid,
        lesson: &LessonDraft,
    ) -> DatabaseResult<LessonRecord> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::CreateLesson {
            course_id,
            title: lesson.title.clone(),
            order_index: lesson.order_index,
        });
        state.take_failure(FailOn::CreateLesson)?;

        let course = state
            .courses
            .get_mut(&course_id)
            .ok_or(DatabaseError::not_found(ResourceType::Course))?;
        let record = LessonRecord {
            id: Uuid::new_v4(),
            course_id,
            title: lesson.title.clone(),
            content: Some(lesson.content.clone()),
            order_index: lesson.order_index,
        };
        course.lessons.push(record.clone());
        Ok(record)
    }

    async fn update_lesson(
        &self,
        lesson_id: Uuid,
        changes: &LessonChanges,
    ) -> DatabaseResult<LessonRecord> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::UpdateLesson {
            lesson_id,
            order_index: changes.order_index,
        });
        state.take_failure(FailOn::UpdateLesson)?;

        let lesson = state
            .find_lesson_mut(lesson_id)
            .ok_or(DatabaseError::not_found(ResourceType::Lesson))?;
        if let Some(title) = &changes.title {
            lesson.title = title.clone();
        }
        if let Some(content) = &changes.content {
            lesson.content = Some(content.clone());
        }
        if let Some(order_index) = changes.order_index {
            lesson.order_index = order_index;
        }
        Ok(lesson.clone())
    }

    async fn fetch_enrollment(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> DatabaseResult<Option<Enrollment>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::FetchEnrollment {
            course_id,
            student_id,
        });
        Ok(state
            .enrollments
            .values()
            .find(|e| e.course_id() == course_id && e.student_id() == student_id)
            .cloned())
    }

    async fn create_enrollment(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> DatabaseResult<Enrollment> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::CreateEnrollment {
            course_id,
            student_id,
        });
        state.take_failure(FailOn::CreateEnrollment)?;

        let exists = state
            .enrollments
            .values()
            .any(|e| e.course_id() == course_id && e.student_id() == student_id);
        if exists {
            return Err(DatabaseError::conflict(ResourceType::Enrollment));
        }

        let enrollment = Enrollment::new(Uuid::new_v4(), course_id, student_id, ProgressMap::new());
        state.enrollments.insert(enrollment.id(), enrollment.clone());
        Ok(enrollment)
    }

    async fn update_enrollment_progress(
        &self,
        enrollment_id: Uuid,
        progress: &ProgressMap,
    ) -> DatabaseResult<Enrollment> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(StoreCall::UpdateEnrollmentProgress(enrollment_id));
        state.take_failure(FailOn::UpdateEnrollmentProgress)?;

        let existing = state
            .enrollments
            .get(&enrollment_id)
            .ok_or(DatabaseError::not_found(ResourceType::Enrollment))?;
        let updated = Enrollment::new(
            existing.id(),
            existing.course_id(),
            existing.student_id(),
            progress.clone(),
        );
        state.enrollments.insert(enrollment_id, updated.clone());
        Ok(updated)
    }
}
