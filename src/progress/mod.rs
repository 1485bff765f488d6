mod enrollment;
pub use enrollment::{Enrollment, LessonProgress, ProgressMap, progress_from_json};

mod navigation;
pub use navigation::{LessonLink, LessonNavigation};

mod tracker;
pub use tracker::{CourseProgress, ProgressTracker};
