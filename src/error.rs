use thiserror::Error;
use tracing::error;
use tracing_error::SpanTrace;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("database error: {0}")]
    DatabaseError(#[from] crate::model::DatabaseError),
    #[error("action error: {0}")]
    ActionError(#[from] crate::action::ActionError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Process exit status: 2 for a rejected action, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ActionError(_) => 2,
            _ => 1,
        }
    }
}

/// Runs `run` and exits the process if it fails. Rejected actions are
/// reported as a notice on stderr, other failures are logged.
pub async fn run_with_error_handler<F, T>(run: F) -> T
where
    F: AsyncFnOnce() -> AppResult<T>,
{
    match run().await {
        Ok(value) => value,
        Err(e) => {
            let code = e.exit_code();
            default_error_handler(e);
            std::process::exit(code);
        }
    }
}

fn default_error_handler(error: AppError) {
    match error {
        AppError::ActionError(e) => eprintln!("{}", e.notice()),
        other => log_error(&other),
    }
}

pub fn log_error<E: std::error::Error + std::fmt::Display>(error: &E) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}
