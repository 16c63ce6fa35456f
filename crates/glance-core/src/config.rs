//! Application configuration (`config.toml`).

use serde::{Deserialize, Serialize};

use crate::error::{GlanceError, Result};
use crate::session::Mode;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub limits: LimitsConfig,
}

/// Remote completion endpoint settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    /// Model used for follow-up derivation; `model` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            followup_model: None,
            temperature: None,
            timeout_secs: 60,
        }
    }
}

impl CompletionConfig {
    pub fn followup_model(&self) -> &str {
        self.followup_model.as_deref().unwrap_or(&self.model)
    }
}

/// Token ceilings per request kind.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    pub short_max_tokens: u32,
    pub long_max_tokens: u32,
    pub followup_max_tokens: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            short_max_tokens: 300,
            long_max_tokens: 1200,
            followup_max_tokens: 200,
        }
    }
}

impl LimitsConfig {
    /// Response-length ceiling for a primary completion.
    pub fn max_tokens(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Short => self.short_max_tokens,
            Mode::Long => self.long_max_tokens,
        }
    }
}

impl AppConfig {
    /// Rejects configurations that break the mode contract.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.short_max_tokens == 0 || limits.long_max_tokens == 0 {
            return Err(GlanceError::config("token ceilings must be positive"));
        }
        if limits.followup_max_tokens == 0 {
            return Err(GlanceError::config("followup_max_tokens must be positive"));
        }
        if limits.short_max_tokens >= limits.long_max_tokens {
            return Err(GlanceError::config(format!(
                "short_max_tokens ({}) must be smaller than long_max_tokens ({})",
                limits.short_max_tokens, limits.long_max_tokens
            )));
        }
        if self.completion.model.trim().is_empty() {
            return Err(GlanceError::config("completion.model must not be empty"));
        }
        if self.completion.endpoint.trim().is_empty() {
            return Err(GlanceError::config("completion.endpoint must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert!(config.limits.max_tokens(Mode::Short) < config.limits.max_tokens(Mode::Long));
        assert_eq!(config.completion.followup_model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [completion]
            followup_model = "gpt-3.5-turbo"
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert_eq!(config.completion.followup_model(), "gpt-3.5-turbo");
        assert_eq!(config.limits, LimitsConfig::default());
    }

    #[test]
    fn test_short_must_be_smaller_than_long() {
        let mut config = AppConfig::default();
        config.limits.short_max_tokens = 1200;
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
    }
}
