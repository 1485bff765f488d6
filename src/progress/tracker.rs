use tracing::{debug, info};
use uuid::Uuid;

use crate::action::{ActionContext, ActionError, ActionResult};
use crate::model::{CourseStore, DatabaseError, ResourceType};
use crate::progress::{Enrollment, LessonLink, LessonNavigation, LessonProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseProgress {
    pub total_lessons: usize,
    pub completed_lessons: usize,
}

impl CourseProgress {
    /// Counts only completions of lessons that belong to the course.
    pub fn compute<'a, I>(enrollment: Option<&Enrollment>, lesson_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut total_lessons = 0;
        let mut completed_lessons = 0;
        for id in lesson_ids {
            total_lessons += 1;
            if enrollment.is_some_and(|e| e.is_completed(id)) {
                completed_lessons += 1;
            }
        }
        Self {
            total_lessons,
            completed_lessons,
        }
    }

    /// Completion in percent, 0 for a course without lessons.
    pub fn percentage(&self) -> f64 {
        if self.total_lessons == 0 {
            return 0.0;
        }
        self.completed_lessons as f64 / self.total_lessons as f64 * 100.0
    }
}

/// Progress of one student in one course.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    course_id: Uuid,
    student_id: Uuid,
    lessons: Vec<LessonLink>,
    enrollment: Option<Enrollment>,
}

impl ProgressTracker {
    #[tracing::instrument(skip(store, ctx))]
    pub async fn load<S>(store: &S, ctx: &ActionContext, course_id: Uuid) -> ActionResult<Self>
    where
        S: CourseStore + ?Sized,
    {
        let actor = ctx.user()?;
        let student_id = actor.user_id();
        debug!("{} {student_id} opening course progress", actor.user_role());

        let course = store
            .fetch_course(course_id)
            .await
            .map_err(|e| ActionError::persistence(ResourceType::Course, e))?;
        let enrollment = store
            .fetch_enrollment(course_id, student_id)
            .await
            .map_err(|e| ActionError::persistence(ResourceType::Enrollment, e))?;

        let mut lessons: Vec<LessonLink> = course.lessons.iter().map(LessonLink::from).collect();
        lessons.sort_by_key(|l| l.order_index);

        Ok(Self {
            course_id,
            student_id,
            lessons,
            enrollment,
        })
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn lessons(&self) -> &[LessonLink] {
        &self.lessons
    }

    pub fn enrollment(&self) -> Option<&Enrollment> {
        self.enrollment.as_ref()
    }

    pub fn is_enrolled(&self) -> bool {
        self.enrollment.is_some()
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.enrollment
            .as_ref()
            .is_some_and(|e| e.is_completed(lesson_id))
    }

    pub fn course_progress(&self) -> CourseProgress {
        CourseProgress::compute(
            self.enrollment.as_ref(),
            self.lessons.iter().map(|l| l.id.as_str()),
        )
    }

    pub fn navigation(&self, lesson_id: &str) -> Option<LessonNavigation> {
        LessonNavigation::locate(&self.lessons, lesson_id)
    }

    /// First lesson after `lesson_id` that is not completed yet.
    pub fn next_uncompleted(&self, lesson_id: &str) -> Option<&LessonLink> {
        let index = self.lessons.iter().position(|l| l.id == lesson_id)?;
        self.lessons[index + 1..]
            .iter()
            .find(|l| !self.is_completed(&l.id))
    }

    /// Creates the enrollment. Enrolling twice is an error.
    #[tracing::instrument(skip(self, store), fields(course_id = %self.course_id))]
    pub async fn enroll<S>(&mut self, store: &S) -> ActionResult<&Enrollment>
    where
        S: CourseStore + ?Sized,
    {
        if self.enrollment.is_some() {
            return Err(ActionError::already_enrolled());
        }

        let existing = store
            .fetch_enrollment(self.course_id, self.student_id)
            .await
            .map_err(|e| ActionError::persistence(ResourceType::Enrollment, e))?;
        if let Some(existing) = existing {
            self.enrollment = Some(existing);
            return Err(ActionError::already_enrolled());
        }

        let created = store
            .create_enrollment(self.course_id, self.student_id)
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict { .. } => ActionError::already_enrolled(),
                e => ActionError::persistence(ResourceType::Enrollment, e),
            })?;

        info!("student {} enrolled", self.student_id);
        Ok(self.enrollment.insert(created))
    }

    /// Marks a lesson complete. Completing it again changes nothing.
    #[tracing::instrument(skip(self, store), fields(course_id = %self.course_id))]
    pub async fn mark_complete<S>(&mut self, store: &S, lesson_id: &str) -> ActionResult<&Enrollment>
    where
        S: CourseStore + ?Sized,
    {
        if lesson_id.trim().is_empty() {
            return Err(ActionError::missing_lesson());
        }
        let Some(current) = self.enrollment.take() else {
            return Err(ActionError::not_enrolled());
        };

        match self.record_completion(store, &current, lesson_id).await {
            Ok(Some(updated)) => Ok(self.enrollment.insert(updated)),
            Ok(None) => Ok(self.enrollment.insert(current)),
            Err(e) => {
                self.enrollment = Some(current);
                Err(e)
            }
        }
    }

    /// `None` when `current` already has the lesson completed.
    async fn record_completion<S>(
        &self,
        store: &S,
        current: &Enrollment,
        lesson_id: &str,
    ) -> ActionResult<Option<Enrollment>>
    where
        S: CourseStore + ?Sized,
    {
        if !self.lessons.iter().any(|l| l.id == lesson_id) {
            return Err(ActionError::unknown_lesson(lesson_id));
        }
        if current.is_completed(lesson_id) {
            debug!("lesson {lesson_id} already completed");
            return Ok(None);
        }

        // merge into the stored map, other sessions may have written since load
        let stored = store
            .fetch_enrollment(self.course_id, self.student_id)
            .await
            .map_err(|e| ActionError::persistence(ResourceType::Enrollment, e))?
            .ok_or(ActionError::not_enrolled())?;
        if stored.is_completed(lesson_id) {
            debug!("lesson {lesson_id} was completed elsewhere");
            return Ok(Some(stored));
        }

        let mut progress = stored.progress().clone();
        progress.insert(lesson_id.to_string(), LessonProgress::completed_now());

        let updated = store
            .update_enrollment_progress(stored.id(), &progress)
            .await
            .map_err(|e| ActionError::persistence(ResourceType::Enrollment, e))?;
        Ok(Some(updated))
    }
}
