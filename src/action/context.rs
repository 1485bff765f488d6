//! Who performs an action, e.g. user id and role.
//!

use crate::action::{ActionResult, error::ActionError};

#[derive(Debug, Clone)]
pub struct Actor {
    user_id: uuid::Uuid,
    user_role: UserRole,
}

impl Actor {
    pub fn new(user_id: uuid::Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn instructor(user_id: uuid::Uuid) -> Self {
        Self::new(user_id, UserRole::Instructor)
    }

    pub fn student(user_id: uuid::Uuid) -> Self {
        Self::new(user_id, UserRole::Student)
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.user_id
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Instructor,
    Student,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Instructor => write!(f, "instructor"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    maybe_user: Option<Actor>,
}

impl ActionContext {
    pub fn new(maybe_user: Option<Actor>) -> Self {
        Self { maybe_user }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn maybe_user(&self) -> Option<&Actor> {
        self.maybe_user.as_ref()
    }

    pub fn user(&self) -> ActionResult<&Actor> {
        self.maybe_user.as_ref().ok_or(ActionError::auth_required())
    }
}

impl From<Actor> for ActionContext {
    fn from(actor: Actor) -> Self {
        Self::new(Some(actor))
    }
}
