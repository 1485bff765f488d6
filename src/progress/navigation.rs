use serde::Serialize;

use crate::model::LessonRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonLink {
    pub id: String,
    pub title: String,
    pub order_index: i32,
}

impl From<&LessonRecord> for LessonLink {
    fn from(record: &LessonRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            order_index: record.order_index,
        }
    }
}

/// Position of a lesson within its course, for previous/next controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonNavigation {
    pub prev: Option<LessonLink>,
    pub next: Option<LessonLink>,
    /// 1-based
    pub current: usize,
    pub total: usize,
}

impl LessonNavigation {
    /// `lessons` must be sorted by `order_index`.
    pub fn locate(lessons: &[LessonLink], lesson_id: &str) -> Option<Self> {
        let index = lessons.iter().position(|l| l.id == lesson_id)?;

        Some(Self {
            prev: index.checked_sub(1).map(|i| lessons[i].clone()),
            next: lessons.get(index + 1).cloned(),
            current: index + 1,
            total: lessons.len(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn links(ids: &[&str]) -> Vec<LessonLink> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| LessonLink {
                id: id.to_string(),
                title: format!("Lesson {}", i + 1),
                order_index: i as i32,
            })
            .collect()
    }

    #[test]
    fn middle_lesson_has_both_neighbours() {
        let lessons = links(&["a", "b", "c"]);
        let nav = LessonNavigation::locate(&lessons, "b").unwrap();
        assert_eq!(nav.prev.map(|l| l.id), Some("a".to_string()));
        assert_eq!(nav.next.map(|l| l.id), Some("c".to_string()));
        assert_eq!((nav.current, nav.total), (2, 3));
    }

    #[test]
    fn edges() {
        let lessons = links(&["a", "b"]);
        let first = LessonNavigation::locate(&lessons, "a").unwrap();
        assert!(first.prev.is_none());
        let last = LessonNavigation::locate(&lessons, "b").unwrap();
        assert!(last.next.is_none());
        assert!(LessonNavigation::locate(&lessons, "zzz").is_none());
    }
}
