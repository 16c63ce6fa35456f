//! Unified path management for glance configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/glance/            # Config directory (platform specific)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API key and project id
//! └── logs/                    # Application logs
//!     └── glance.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "glance";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for glance_core::GlanceError {
    fn from(err: PathError) -> Self {
        glance_core::GlanceError::config(err.to_string())
    }
}

/// Resolves every file location used by glance.
///
/// `base` overrides the platform config directory, which keeps tests
/// away from the user's real configuration.
#[derive(Debug, Clone, Default)]
pub struct GlancePaths {
    base: Option<PathBuf>,
}

impl GlancePaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the glance configuration directory (e.g. `~/.config/glance/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// The file is written with 600 permissions on Unix.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let paths = GlancePaths::new(Some(Path::new("/tmp/glance-test")));
        assert_eq!(paths.config_dir().unwrap(), PathBuf::from("/tmp/glance-test"));
        assert_eq!(
            paths.secret_file().unwrap(),
            PathBuf::from("/tmp/glance-test/secret.json")
        );
    }

    #[test]
    fn test_files_live_under_config_dir() {
        let paths = GlancePaths::new(Some(Path::new("/tmp/glance-test")));
        let config_dir = paths.config_dir().unwrap();
        assert!(paths.config_file().unwrap().starts_with(&config_dir));
        assert!(paths.logs_dir().unwrap().ends_with("logs"));
    }
}
