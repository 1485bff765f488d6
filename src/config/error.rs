use std::path::PathBuf;

use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config is not valid utf-8: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("config parse error: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("no config file at {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: &'static str },
}
