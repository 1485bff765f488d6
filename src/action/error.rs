use serde::Serialize;
use thiserror::Error;

use crate::{
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type ActionResult<T> = std::result::Result<T, ActionError>;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("ValidationMissingTitle")]
    MissingTitle,

    #[error("ValidationUnknownLesson: {lesson_id}")]
    UnknownLesson { lesson_id: String },

    #[error("ValidationMissingLesson")]
    MissingLesson,

    #[error("ValidationAlreadyEnrolled")]
    AlreadyEnrolled,

    #[error("ValidationNotEnrolled")]
    NotEnrolled,
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationRequired")]
    AuthenticationRequired,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("PersistenceFailed: {resource_type:?}. Error: {error}")]
    PersistenceFailed {
        resource_type: ResourceType,
        error: DatabaseError,
    },
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingTitle | Self::MissingLesson => "Missing information",
            _ => "Error",
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::MissingTitle => String::from("Please provide a course title."),
            Self::UnknownLesson { .. } => String::from("This lesson does not belong to the course."),
            Self::MissingLesson => String::from("Missing enrollment or lesson information."),
            Self::AlreadyEnrolled => String::from("You are already enrolled in this course."),
            Self::NotEnrolled => String::from("You are not enrolled in this course."),
        }
    }
}

impl AuthenticationError {
    pub fn title(&self) -> &'static str {
        "Authentication error"
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationRequired => String::from("You must be logged in to do this."),
        }
    }
}

impl PersistenceError {
    pub fn title(&self) -> &'static str {
        "Error"
    }

    /// Surfaces the underlying store message so the user knows what failed.
    pub fn client_display(&self) -> String {
        match self {
            Self::PersistenceFailed { error, .. } => format!("Error: {error}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("ValidationError - {0}")]
    ValidationError(#[from] ValidationError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("PersistenceError - {0}")]
    PersistenceError(#[from] PersistenceError),
}

impl ActionError {
    pub fn missing_title() -> Self {
        Self::ValidationError(ValidationError::MissingTitle)
    }

    pub fn unknown_lesson<S: Into<String>>(lesson_id: S) -> Self {
        Self::ValidationError(ValidationError::UnknownLesson {
            lesson_id: lesson_id.into(),
        })
    }

    pub fn missing_lesson() -> Self {
        Self::ValidationError(ValidationError::MissingLesson)
    }

    pub fn already_enrolled() -> Self {
        Self::ValidationError(ValidationError::AlreadyEnrolled)
    }

    pub fn not_enrolled() -> Self {
        Self::ValidationError(ValidationError::NotEnrolled)
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn persistence(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::PersistenceError(PersistenceError::PersistenceFailed {
            resource_type: r#type,
            error,
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ValidationError(e) => e.title(),
            Self::AuthenticationError(e) => e.title(),
            Self::PersistenceError(e) => e.title(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ValidationError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::PersistenceError(e) => e.client_display(),
        }
    }

    /// Logs the error and turns it into a notification for the user.
    pub fn notice(&self) -> Notice {
        log_error(self);
        Notice {
            title: self.title().to_string(),
            description: self.client_display(),
            variant: NoticeVariant::Destructive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// User-visible notification produced at the mutation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
