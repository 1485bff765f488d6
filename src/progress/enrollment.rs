use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    pub fn completed_now() -> Self {
        Self {
            completed: true,
            completed_at: Some(Utc::now()),
        }
    }
}

/// Lesson id to completion state.
pub type ProgressMap = BTreeMap<String, LessonProgress>;

/// Parses a persisted progress object, dropping entries that do not fit.
pub fn progress_from_json(value: Option<&Value>) -> ProgressMap {
    let Some(Value::Object(entries)) = value else {
        return ProgressMap::new();
    };

    entries
        .iter()
        .filter_map(|(lesson_id, entry)| {
            match serde_json::from_value::<LessonProgress>(entry.clone()) {
                Ok(progress) => Some((lesson_id.clone(), progress)),
                Err(e) => {
                    tracing::debug!("dropping malformed progress for lesson {lesson_id}: {e}");
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    id: Uuid,
    course_id: Uuid,
    student_id: Uuid,
    progress: ProgressMap,
}

impl Enrollment {
    pub fn new(id: Uuid, course_id: Uuid, student_id: Uuid, progress: ProgressMap) -> Self {
        Self {
            id,
            course_id,
            student_id,
            progress,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.progress.get(lesson_id).is_some_and(|p| p.completed)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_wellformed_progress() {
        let raw = json!({
            "l1": {"completed": true, "completed_at": "2024-03-01T10:00:00Z"},
            "l2": {"completed": false, "completed_at": null},
        });
        let map = progress_from_json(Some(&raw));
        assert_eq!(map.len(), 2);
        assert!(map["l1"].completed);
        assert!(map["l1"].completed_at.is_some());
        assert!(!map["l2"].completed);
    }

    #[test]
    fn drops_malformed_entries() {
        let raw = json!({
            "l1": {"completed": true},
            "l2": "yes",
            "l3": {"done": true},
        });
        let map = progress_from_json(Some(&raw));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["l1"]);
        assert!(progress_from_json(Some(&json!([1, 2]))).is_empty());
        assert!(progress_from_json(None).is_empty());
    }
}
