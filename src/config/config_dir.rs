use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{ConfigError, ConfigResult};

/// Environment variable pointing straight at a config file.
pub static CONFIG_ENV: &str = "LECTERN_CONFIG";

static LOCAL_CONFIG: &str = "./config.toml";

/// Per-user config location, e.g. `~/.config/lectern/config.toml`.
pub fn user_config_file(home: &Path) -> PathBuf {
    let mut path = home.to_path_buf();

    if cfg!(unix) {
        path = path.join(".config");
    }

    path.join(crate::APPLICATION_NAME).join("config.toml")
}

pub fn find_config_file(use_local: bool) -> PathBuf {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(explicit);
    }

    if use_local {
        return PathBuf::from(LOCAL_CONFIG);
    }

    #[cfg(unix)]
    let home = std::env::var_os("HOME");
    #[cfg(windows)]
    let home = std::env::var_os("APPDATA");
    #[cfg(not(any(unix, windows)))]
    let home: Option<std::ffi::OsString> = None;

    if let Some(home) = home {
        let path = user_config_file(Path::new(&home));
        if path.exists() {
            return path;
        }
    }

    PathBuf::from(LOCAL_CONFIG)
}

pub fn read_config_at(path: &Path) -> ConfigResult<Vec<u8>> {
    tracing::trace!("looking for config at: {}", path.display());
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let path = path.canonicalize()?;
    debug!("using {} as configuration file", path.display());

    Ok(std::fs::read(path)?)
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    read_config_at(&find_config_file(use_local))
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn test_user_config_file_layout() {
        let path = user_config_file(Path::new("/home/someone"));
        assert!(path.ends_with(PathBuf::from(crate::APPLICATION_NAME).join("config.toml")));
        #[cfg(unix)]
        assert!(path.starts_with("/home/someone/.config"));
    }

    #[test]
    fn test_read_config_at_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(&file_path, b"[store]\ndatabase_uri = 'postgres://x'").unwrap();

        let bytes = read_config_at(&file_path).unwrap();
        assert_eq!(bytes, b"[store]\ndatabase_uri = 'postgres://x'");
    }

    #[test]
    fn test_read_config_at_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_config_at(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(p)) if p.ends_with("nope.toml")));
    }
}
