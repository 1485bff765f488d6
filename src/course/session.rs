//! Course-authoring session: course metadata, lessons and the lesson being
//! edited, with every mutation going through here.
//!
//! Content blocks are never copied out of their lesson. The block
//! accessors and mutators resolve the active lesson by id and work on its
//! own collection, so switching lessons cannot drop edits.

use std::collections::HashMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::action::{ActionContext, ActionError, ActionResult};
use crate::course::{
    BlockKind, ContentBlock, ContentBlocks, CourseDetails, CourseField, Lesson, LessonId,
    LessonStore, transform_content,
};
use crate::model::{
    CourseStore, DatabaseError, DatabaseResult, LessonChanges, LessonDraft, LessonRecord,
    ResourceType,
};

static WELCOME_TEXT: &str = "Welcome to the course! This is a sample lesson content.";

#[derive(Debug, Clone)]
pub struct AuthoringSession {
    course_id: Option<Uuid>,
    details: CourseDetails,
    lessons: LessonStore,
    active_lesson: Option<LessonId>,
    saving: bool,
}

impl Default for AuthoringSession {
    fn default() -> Self {
        Self::new()
    }
}

fn introduction_lesson() -> Lesson {
    Lesson {
        id: LessonId::new("temp-1"),
        title: String::from("Introduction"),
        content: ContentBlocks::from(vec![ContentBlock {
            id: String::from("block-1"),
            kind: BlockKind::Text,
            content: String::from(WELCOME_TEXT),
        }]),
        order_index: 0,
    }
}

impl From<LessonRecord> for Lesson {
    fn from(record: LessonRecord) -> Self {
        Self {
            id: record.id.into(),
            title: record.title,
            content: transform_content(record.content.as_ref()).into(),
            order_index: record.order_index,
        }
    }
}

impl AuthoringSession {
    /// A fresh session for a new course with a single introduction lesson.
    pub fn new() -> Self {
        let intro = introduction_lesson();
        Self {
            course_id: None,
            details: CourseDetails::default(),
            active_lesson: Some(intro.id.clone()),
            lessons: LessonStore::new(vec![intro]),
            saving: false,
        }
    }

    /// Opens an existing course for editing.
    #[tracing::instrument(skip(store))]
    pub async fn load<S>(store: &S, course_id: Uuid) -> ActionResult<Self>
    where
        S: CourseStore + ?Sized,
    {
        let record = store
            .fetch_course(course_id)
            .await
            .map_err(|e| ActionError::persistence(ResourceType::Course, e))?;

        let mut session = Self::new();
        session.course_id = Some(record.id);
        session.details = record.details;

        if !record.lessons.is_empty() {
            let lessons: Vec<Lesson> = record.lessons.into_iter().map(Lesson::from).collect();
            session.lessons = LessonStore::new(lessons);
            session.active_lesson = session.lessons.first().map(|l| l.id.clone());
        }

        debug!("loaded course {course_id} with {} lessons", session.lessons.len());
        Ok(session)
    }

    pub fn course_id(&self) -> Option<Uuid> {
        self.course_id
    }

    pub fn is_existing_course(&self) -> bool {
        self.course_id.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn details(&self) -> &CourseDetails {
        &self.details
    }

    pub fn lessons(&self) -> &[Lesson] {
        self.lessons.as_slice()
    }

    pub fn active_lesson_id(&self) -> Option<&LessonId> {
        self.active_lesson.as_ref()
    }

    pub fn active_lesson(&self) -> Option<&Lesson> {
        self.active_lesson.as_ref().and_then(|id| self.lessons.get(id))
    }

    /// Blocks of the active lesson, read straight from the lesson.
    pub fn content_blocks(&self) -> &[ContentBlock] {
        self.active_lesson()
            .map(|l| l.content.as_slice())
            .unwrap_or_default()
    }

    fn active_blocks_mut(&mut self) -> Option<&mut ContentBlocks> {
        let id = self.active_lesson.as_ref()?;
        self.lessons.get_mut(id).map(|l| &mut l.content)
    }

    pub fn update_course_details(&mut self, field: CourseField) {
        self.details.apply(field);
    }

    pub fn set_active_lesson(&mut self, id: &LessonId) -> ActionResult<()> {
        if self.lessons.get(id).is_none() {
            return Err(ActionError::unknown_lesson(id.as_str()));
        }
        self.active_lesson = Some(id.clone());
        Ok(())
    }

    /// Appends a lesson and makes it the active one.
    pub fn add_lesson(&mut self) -> LessonId {
        let id = self.lessons.add_lesson();
        self.active_lesson = Some(id.clone());
        id
    }

    pub fn update_lesson_title(&mut self, title: impl Into<String>) -> bool {
        match self.active_lesson.clone() {
            Some(id) => self.lessons.update_title(&id, title),
            None => false,
        }
    }

    pub fn rename_lesson(&mut self, id: &LessonId, title: impl Into<String>) -> bool {
        self.lessons.update_title(id, title)
    }

    pub fn reorder_lessons(&mut self, source: usize, destination: usize) {
        self.lessons.reorder(source, destination);
    }

    pub fn add_content_block(&mut self, kind: BlockKind) -> Option<String> {
        self.active_blocks_mut()
            .map(|blocks| blocks.add_block(kind).id.clone())
    }

    pub fn update_block_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        self.active_blocks_mut()
            .is_some_and(|blocks| blocks.update_block(id, content))
    }

    pub fn delete_block(&mut self, id: &str) -> bool {
        self.active_blocks_mut()
            .is_some_and(|blocks| blocks.delete_block(id))
    }

    /// Validates, checks the actor and takes a snapshot to persist. Returns
    /// `None` while another save of this session is outstanding.
    pub fn begin_save(&mut self, ctx: &ActionContext) -> ActionResult<Option<SavePlan>> {
        if self.details.title.trim().is_empty() {
            return Err(ActionError::missing_title());
        }
        let actor = ctx.user()?;

        if self.saving {
            debug!("save already in flight, ignoring request");
            return Ok(None);
        }
        self.saving = true;

        let mut lessons: Vec<Lesson> = self.lessons.as_slice().to_vec();
        lessons.sort_by_key(|l| l.order_index);

        Ok(Some(SavePlan {
            course_id: self.course_id,
            instructor_id: actor.user_id(),
            details: self.details.clone(),
            lessons,
        }))
    }

    /// Applies the outcome of [`SavePlan::execute`]. A failed save leaves
    /// the editing state as it was.
    pub fn finish_save(&mut self, result: DatabaseResult<SaveReport>) -> ActionResult<SaveReport> {
        self.saving = false;

        let report = result.map_err(|e| ActionError::persistence(ResourceType::Course, e))?;

        self.course_id = Some(report.course_id);
        for (draft, persisted) in &report.persisted_ids {
            if !self.lessons.rename_id(draft, persisted.clone()) {
                continue;
            }
            if self.active_lesson.as_ref() == Some(draft) {
                self.active_lesson = Some(persisted.clone());
            }
        }

        info!(
            "course {} saved: {} lessons inserted, {} updated",
            report.course_id, report.inserted, report.updated
        );
        Ok(report)
    }

    /// Begin, execute and finish a save in one go. `Ok(None)` means the
    /// request was ignored because a save is already running.
    #[tracing::instrument(skip_all)]
    pub async fn save<S>(
        &mut self,
        store: &S,
        ctx: &ActionContext,
    ) -> ActionResult<Option<SaveReport>>
    where
        S: CourseStore + ?Sized,
    {
        let Some(plan) = self.begin_save(ctx)? else {
            return Ok(None);
        };
        let result = plan.execute(store).await;
        self.finish_save(result).map(Some)
    }

    /// Persists the publish flag of an existing course; a new course keeps
    /// it for its first save.
    pub async fn set_published<S>(
        &mut self,
        store: &S,
        ctx: &ActionContext,
        published: bool,
    ) -> ActionResult<()>
    where
        S: CourseStore + ?Sized,
    {
        ctx.user()?;

        if let Some(course_id) = self.course_id {
            store
                .update_course_published(course_id, published)
                .await
                .map_err(|e| ActionError::persistence(ResourceType::Course, e))?;
        }
        self.details.published = published;
        Ok(())
    }
}

/// Owned snapshot of what a save writes.
#[derive(Debug, Clone)]
pub struct SavePlan {
    course_id: Option<Uuid>,
    instructor_id: Uuid,
    details: CourseDetails,
    lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub course_id: Uuid,
    pub created_course: bool,
    pub inserted: usize,
    pub updated: usize,
    /// Draft id to the id assigned by the store.
    pub persisted_ids: HashMap<LessonId, LessonId>,
}

impl SavePlan {
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Writes the snapshot. Not transactional: steps that succeeded before
    /// a failure stay persisted.
    pub async fn execute<S>(self, store: &S) -> DatabaseResult<SaveReport>
    where
        S: CourseStore + ?Sized,
    {
        let (course_id, created_course) = match self.course_id {
            Some(id) => (id, false),
            None => {
                let id = store.create_course(&self.details, self.instructor_id).await?;
                (id, true)
            }
        };

        let mut report = SaveReport {
            course_id,
            created_course,
            inserted: 0,
            updated: 0,
            persisted_ids: HashMap::new(),
        };

        for lesson in &self.lessons {
            if created_course || lesson.id.is_temporary() {
                let record = store
                    .create_lesson(course_id, &LessonDraft::from(lesson))
                    .await?;
                report
                    .persisted_ids
                    .insert(lesson.id.clone(), LessonId::from(record.id));
                report.inserted += 1;
            } else {
                let lesson_id = lesson
                    .id
                    .as_str()
                    .parse::<Uuid>()
                    .map_err(|_| DatabaseError::InvalidId(lesson.id.to_string()))?;
                store
                    .update_lesson(lesson_id, &LessonChanges::from(lesson))
                    .await?;
                report.updated += 1;
            }
        }

        Ok(report)
    }
}
