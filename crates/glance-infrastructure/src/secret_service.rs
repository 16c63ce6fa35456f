//! Credential store backed by `secret.json`.
//!
//! The file holds the same two keys the browser settings page stores:
//!
//! ```json
//! { "apiKey": "sk-...", "projectId": "proj_..." }
//! ```

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use glance_core::secret::{CredentialService, Credentials};
use glance_core::{GlanceError, Result};

use crate::paths::GlancePaths;

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const PROJECT_ID_ENV: &str = "OPENAI_PROJECT_ID";

/// Service for reading and writing API credentials.
///
/// Loaded credentials are cached, so a service instance reads the file at
/// most once. Panels receive credentials exactly once at launch.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env_fallback: bool,
    cache: Arc<RwLock<Option<Credentials>>>,
}

impl SecretServiceImpl {
    /// Creates a service for the secret file under `base` (or the platform
    /// config directory). Environment fallback is enabled.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = GlancePaths::new(base_path).secret_file()?;
        Ok(Self::with_path(path))
    }

    /// Creates a service for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_fallback: true,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Enables or disables the `OPENAI_API_KEY` / `OPENAI_PROJECT_ID` fallback.
    pub fn with_env_fallback(mut self, enabled: bool) -> Self {
        self.env_fallback = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists credentials, replacing the file atomically.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(credentials)?;
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &self.path)?;

        let mut cache = self
            .cache
            .write()
            .map_err(|_| GlanceError::internal("credential cache lock poisoned"))?;
        *cache = Some(credentials.clone());

        tracing::info!(path = %self.path.display(), "Credentials saved");
        Ok(())
    }

    fn read_file(&self) -> Result<Credentials> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Credentials::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn read_env() -> Credentials {
        Credentials {
            api_key: env::var(API_KEY_ENV).unwrap_or_default(),
            project_id: env::var(PROJECT_ID_ENV).unwrap_or_default(),
        }
    }

    fn load_internal(&self) -> Result<Credentials> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| GlanceError::internal("credential cache lock poisoned"))?;
            if let Some(cached) = cache.as_ref() {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.read_file()?;
        if !loaded.is_complete() && self.env_fallback {
            let from_env = Self::read_env();
            if from_env.is_complete() {
                tracing::debug!("Using credentials from environment");
                loaded = from_env;
            }
        }

        let mut cache = self
            .cache
            .write()
            .map_err(|_| GlanceError::internal("credential cache lock poisoned"))?;
        *cache = Some(loaded.clone());
        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl CredentialService for SecretServiceImpl {
    async fn load_credentials(&self) -> Result<Option<Credentials>> {
        let credentials = self.load_internal()?;
        if credentials.is_complete() {
            Ok(Some(credentials))
        } else {
            tracing::warn!(path = %self.path.display(), "API key or project id not configured");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &tempfile::TempDir) -> SecretServiceImpl {
        SecretServiceImpl::new(Some(dir.path()))
            .unwrap()
            .with_env_fallback(false)
    }

    #[tokio::test]
    async fn test_missing_file_means_no_credentials() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(service(&dir).load_credentials().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_credentials_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("secret.json"), r#"{"apiKey": "sk-1"}"#).unwrap();
        assert_eq!(service(&dir).load_credentials().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = Credentials::new("sk-1", "proj_1");
        service(&dir).save(&credentials).unwrap();

        let fresh = service(&dir);
        assert_eq!(fresh.load_credentials().await.unwrap(), Some(credentials));
        assert!(!dir.path().join("secret.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        service.save(&Credentials::new("sk-1", "proj_1")).unwrap();
        let mode = fs::metadata(service.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_credentials_are_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, r#"{"apiKey": "sk-1", "projectId": "proj_1"}"#).unwrap();

        let service = service(&dir);
        let first = service.load_credentials().await.unwrap();
        fs::write(&path, r#"{"apiKey": "sk-2", "projectId": "proj_2"}"#).unwrap();
        let second = service.load_credentials().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("secret.json"), "{not json").unwrap();
        let err = service(&dir).load_credentials().await.unwrap_err();
        assert!(matches!(err, GlanceError::Serialization { .. }));
    }
}
