//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml`. A missing or empty file yields
//! the defaults; a present file is validated before it is handed out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use glance_core::config::AppConfig;
use glance_core::{GlanceError, Result};

use crate::paths::GlancePaths;

/// Configuration service that loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = GlancePaths::new(base_path).config_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| GlanceError::internal("config cache lock poisoned"))?;
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| GlanceError::internal("config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Writes the default configuration if no file exists yet.
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_config_file(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&AppConfig::default())?;
        fs::write(&self.path, content)?;
        tracing::info!(path = %self.path.display(), "Created default config file");
        Ok(true)
    }

    fn load_config(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(Some(dir.path())).unwrap();
        assert_eq!(service.get_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_file_overrides_limits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[limits]\nshort_max_tokens = 150\nlong_max_tokens = 900\n",
        )
        .unwrap();
        let config = ConfigService::new(Some(dir.path()))
            .unwrap()
            .get_config()
            .unwrap();
        assert_eq!(config.limits.short_max_tokens, 150);
        assert_eq!(config.limits.long_max_tokens, 900);
        assert_eq!(config.limits.followup_max_tokens, 200);
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[limits]\nshort_max_tokens = 900\nlong_max_tokens = 900\n",
        )
        .unwrap();
        let err = ConfigService::new(Some(dir.path()))
            .unwrap()
            .get_config()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_ensure_config_file_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(Some(dir.path())).unwrap();
        assert!(service.ensure_config_file().unwrap());
        assert!(!service.ensure_config_file().unwrap());

        let reloaded = ConfigService::with_path(service.path().to_path_buf());
        assert_eq!(reloaded.get_config().unwrap(), AppConfig::default());
    }
}
