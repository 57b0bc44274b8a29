use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::audio::PcmFormat;
use crate::domain::DomainError;

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the backend, without the version prefix.
    pub base_url: String,
    /// Wall-clock bound on every request.
    pub timeout_secs: u64,
    /// Artificial latency before a simulated response is returned.
    pub simulation_delay_ms: u64,
    /// Fabricate success responses for supported calls when the backend
    /// is unreachable.
    pub simulation_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
            simulation_delay_ms: 800,
            simulation_enabled: true,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn simulation_delay(&self) -> Duration {
        Duration::from_millis(self.simulation_delay_ms)
    }

    /// Check that the base URL is an absolute http(s) origin.
    pub fn validate(&self) -> Result<(), DomainError> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| DomainError::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DomainError::Config(format!(
                    "Unsupported base_url scheme '{}'",
                    other
                )))
            }
        }
        if parsed.host_str().is_none() {
            return Err(DomainError::Config("Invalid base_url: no host".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(DomainError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Generative provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub text_model: String,
    pub chat_model: String,
    pub speech_model: String,
    /// Prebuilt voice used when the caller does not pick one.
    pub default_voice: String,
    /// Read from the environment only, never persisted.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            text_model: "gemini-3-flash-preview".to_string(),
            chat_model: "gemini-3-pro-preview".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            default_voice: "Kore".to_string(),
            api_key: None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub audio: PcmFormat,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup("API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base.trim().to_string();
        }
        self.provider.api_key = lookup("API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .filter(|v| !v.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.simulation_delay(), Duration::from_millis(800));
        assert!(config.api.simulation_enabled);
        assert_eq!(config.audio.sample_rate, 24_000);
        assert_eq!(config.provider.default_voice, "Kore");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("API_BASE_URL", "https://api.brandcraft.io"),
            ("GEMINI_API_KEY", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::new();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "https://api.brandcraft.io");
        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_override_ignored() {
        let mut config = AppConfig::new();
        config.apply_overrides(|k| (k == "API_BASE_URL").then(|| "  ".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_base_url() {
        let mut api = ApiConfig::default();
        assert!(api.validate().is_ok());

        api.base_url = "ftp://files.example.com".to_string();
        assert!(api.validate().is_err());

        api.base_url = "not a url".to_string();
        assert!(api.validate().is_err());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = AppConfig::new();
        config.provider.api_key = Some("secret".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("secret"));
    }
}
