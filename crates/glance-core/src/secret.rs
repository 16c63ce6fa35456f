//! Credential types and the credential store interface.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// API credentials owned by the settings collaborator.
///
/// Read once per panel instantiation and treated as immutable for the
/// lifetime of that panel.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
        }
    }

    /// Both values must be non-blank for the credentials to be usable.
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

// Never print the key.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Read access to stored credentials.
///
/// # Security Note
///
/// Implementations must never log the API key or include it in error messages.
#[async_trait::async_trait]
pub trait CredentialService: Send + Sync {
    /// Loads the stored credentials.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Credentials))`: complete credentials are available
    /// - `Ok(None)`: nothing (or only part of the pair) is configured
    /// - `Err(_)`: the store could not be read
    async fn load_credentials(&self) -> Result<Option<Credentials>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_credentials() {
        assert!(!Credentials::default().is_complete());
        assert!(!Credentials::new("sk-1", "  ").is_complete());
        assert!(Credentials::new("sk-1", "proj_1").is_complete());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", Credentials::new("sk-secret", "proj_1"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("proj_1"));
    }

    #[test]
    fn test_store_format_is_camel_case() {
        let parsed: Credentials =
            serde_json::from_str(r#"{"apiKey": "sk-1", "projectId": "proj_1"}"#).unwrap();
        assert_eq!(parsed, Credentials::new("sk-1", "proj_1"));
    }
}
