use serde::{Deserialize, Serialize};

use crate::course::{BlockKind, ContentBlock, ContentBlocks};
use crate::utils::ids::{self, TEMP_PREFIX};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn temporary() -> Self {
        Self(ids::temp_lesson_id())
    }

    /// Draft lessons need an insert on save, all others an update.
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<uuid::Uuid> for LessonId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub content: ContentBlocks,
    pub order_index: i32,
}

/// Lessons of one course, kept sorted by `order_index`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonStore {
    lessons: Vec<Lesson>,
}

impl LessonStore {
    pub fn new(mut lessons: Vec<Lesson>) -> Self {
        lessons.sort_by_key(|l| l.order_index);
        Self { lessons }
    }

    pub fn as_slice(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn get(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| &l.id == id)
    }

    pub fn get_mut(&mut self, id: &LessonId) -> Option<&mut Lesson> {
        self.lessons.iter_mut().find(|l| &l.id == id)
    }

    pub fn first(&self) -> Option<&Lesson> {
        self.lessons.first()
    }

    pub fn add_lesson(&mut self) -> LessonId {
        let order_index = self
            .lessons
            .iter()
            .map(|l| l.order_index)
            .max()
            .map_or(0, |max| max + 1);

        let lesson = Lesson {
            id: LessonId::temporary(),
            title: format!("Lesson {}", self.lessons.len() + 1),
            content: ContentBlocks::from(vec![ContentBlock::new(BlockKind::Text, "")]),
            order_index,
        };
        let id = lesson.id.clone();
        self.lessons.push(lesson);
        id
    }

    pub fn update_title(&mut self, id: &LessonId, title: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(lesson) => {
                lesson.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Moves the lesson at `source` to `destination` and renumbers every
    /// `order_index` to its position.
    pub fn reorder(&mut self, source: usize, destination: usize) {
        if source != destination && source < self.lessons.len() {
            let moved = self.lessons.remove(source);
            let destination = destination.min(self.lessons.len());
            self.lessons.insert(destination, moved);
        }
        self.normalize();
    }

    pub(crate) fn rename_id(&mut self, from: &LessonId, to: LessonId) -> bool {
        match self.get_mut(from) {
            Some(lesson) => {
                lesson.id = to;
                true
            }
            None => false,
        }
    }

    fn normalize(&mut self) {
        for (index, lesson) in self.lessons.iter_mut().enumerate() {
            lesson.order_index = index as i32;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ids(store: &LessonStore) -> Vec<String> {
        store.as_slice().iter().map(|l| l.id.to_string()).collect()
    }

    fn indices(store: &LessonStore) -> Vec<i32> {
        store.as_slice().iter().map(|l| l.order_index).collect()
    }

    fn store_of(n: usize) -> LessonStore {
        let mut store = LessonStore::default();
        for _ in 0..n {
            store.add_lesson();
        }
        store
    }

    #[test]
    fn first_lesson_gets_index_zero() {
        let mut store = LessonStore::default();
        let id = store.add_lesson();
        assert!(id.is_temporary());
        let lesson = store.get(&id).unwrap();
        assert_eq!(lesson.order_index, 0);
        assert_eq!(lesson.title, "Lesson 1");
        assert_eq!(lesson.content.len(), 1);
    }

    #[test]
    fn add_uses_max_plus_one() {
        let mut store = LessonStore::new(vec![Lesson {
            id: LessonId::new("a"),
            title: "A".into(),
            content: ContentBlocks::default(),
            order_index: 5,
        }]);
        let id = store.add_lesson();
        assert_eq!(store.get(&id).unwrap().order_index, 6);
    }

    #[test]
    fn reorder_moves_and_renumbers() {
        let mut store = store_of(4);
        let before = ids(&store);

        store.reorder(0, 2);
        let after = ids(&store);
        assert_eq!(after, vec![
            before[1].clone(),
            before[2].clone(),
            before[0].clone(),
            before[3].clone(),
        ]);
        assert_eq!(indices(&store), vec![0, 1, 2, 3]);
    }

    #[test]
    fn reorder_same_index_is_noop() {
        let mut store = store_of(3);
        let before = ids(&store);
        store.reorder(1, 1);
        store.reorder(1, 1);
        assert_eq!(ids(&store), before);
        assert_eq!(indices(&store), vec![0, 1, 2]);
    }

    #[test]
    fn reorder_sequences_stay_contiguous() {
        let mut store = store_of(5);
        let moves = [(4, 0), (0, 4), (2, 3), (3, 1), (1, 1), (0, 9), (7, 2)];
        for (src, dst) in moves {
            store.reorder(src, dst);
            let mut seen = indices(&store);
            seen.sort();
            assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn reorder_normalizes_loaded_gaps() {
        let lesson = |id: &str, order_index| Lesson {
            id: LessonId::new(id),
            title: id.into(),
            content: ContentBlocks::default(),
            order_index,
        };
        let mut store = LessonStore::new(vec![lesson("c", 9), lesson("a", 2), lesson("b", 4)]);
        assert_eq!(ids(&store), vec!["a", "b", "c"]);

        store.reorder(0, 0);
        assert_eq!(ids(&store), vec!["a", "b", "c"]);
        assert_eq!(indices(&store), vec![0, 1, 2]);
    }

    #[test]
    fn update_title_only_touches_target() {
        let mut store = store_of(2);
        let first = store.as_slice()[0].id.clone();
        assert!(store.update_title(&first, "Welcome"));
        assert_eq!(store.as_slice()[0].title, "Welcome");
        assert_eq!(store.as_slice()[1].title, "Lesson 2");
        assert!(!store.update_title(&LessonId::new("missing"), "x"));
    }
}
