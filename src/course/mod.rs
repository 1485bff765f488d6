mod block;
pub use block::{BlockKind, ContentBlock, ContentBlocks};

mod content;
pub use content::{RawBlock, content_to_json, transform_content};

mod details;
pub use details::{CourseDetails, CourseField, CourseLevel};

mod lesson;
pub use lesson::{Lesson, LessonId, LessonStore};

mod session;
pub use session::{AuthoringSession, SavePlan, SaveReport};
