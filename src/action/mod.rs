mod context;
pub use context::{ActionContext, Actor, UserRole};

mod error;
pub use error::{
    ActionError, ActionResult, AuthenticationError, Notice, NoticeVariant, PersistenceError,
    ValidationError,
};
