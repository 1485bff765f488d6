#![allow(dead_code)]

use lectern::action::{ActionContext, Actor};
use lectern::course::{CourseDetails, CourseLevel};
use lectern::model::{CourseRecord, LessonRecord, MemoryStore};
use serde_json::{Value, json};
use uuid::Uuid;

pub fn instructor() -> ActionContext {
    ActionContext::from(Actor::instructor(Uuid::new_v4()))
}

pub fn student() -> ActionContext {
    ActionContext::from(Actor::student(Uuid::new_v4()))
}

pub fn details(title: &str) -> CourseDetails {
    CourseDetails {
        title: title.to_string(),
        description: Some(format!("All about {title}")),
        category: String::from("programming"),
        level: Some(CourseLevel::Beginner),
        featured_image: None,
        published: false,
    }
}

pub fn text_content(text: &str) -> Value {
    json!([{ "id": format!("block-{text}"), "type": "text", "content": text }])
}

/// Lessons are given in storage order; `order_index` comes from the tuple.
pub fn lesson(course_id: Uuid, title: &str, order_index: i32, content: Option<Value>) -> LessonRecord {
    LessonRecord {
        id: Uuid::new_v4(),
        course_id,
        title: title.to_string(),
        content,
        order_index,
    }
}

/// Seeds a persisted course with one text lesson per title.
pub async fn seed_course(store: &MemoryStore, title: &str, lessons: &[&str]) -> CourseRecord {
    let id = Uuid::new_v4();
    let course = CourseRecord {
        id,
        instructor_id: Uuid::new_v4(),
        details: details(title),
        lessons: lessons
            .iter()
            .enumerate()
            .map(|(i, t)| lesson(id, t, i as i32, Some(text_content(t))))
            .collect(),
    };
    store.insert_course(course.clone()).await;
    store.clear_calls().await;
    course
}
