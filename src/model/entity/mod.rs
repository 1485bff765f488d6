mod course;
pub use course::{CourseCreate, CourseEntity, CoursePublish, CourseSummaryRow};

mod lesson;
pub use lesson::{LessonCreate, LessonEntity};

mod enrollment;
pub use enrollment::{EnrollmentCreate, EnrollmentEntity};

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{DatabaseError, ResourceType, ResourceTyped};

    #[test]
    fn entities_name_their_resource_in_errors() {
        assert_eq!(CourseEntity::get_resource_type(), ResourceType::Course);
        assert_eq!(LessonEntity::get_resource_type(), ResourceType::Lesson);
        assert_eq!(EnrollmentEntity::get_resource_type(), ResourceType::Enrollment);

        let err = DatabaseError::not_found(LessonEntity::get_resource_type());
        assert_eq!(err.to_string(), "Lesson not found");
    }
}
