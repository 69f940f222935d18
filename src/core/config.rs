//! Configuration management

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ResponseShape, Transport};
use crate::core::preferences::{
    Preferences, LIBRE_TRANSLATE_API_KEY, LIBRE_TRANSLATE_RESPONSE_SHAPE,
    LIBRE_TRANSLATE_SERVER_URL, LIBRE_TRANSLATE_TRANSPORT,
};

/// Public LibreTranslate endpoint
pub const DEFAULT_URL: &str = "https://libretranslate.com/translate";

/// Default request timeout for the shared HTTP client
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Configuration for the LibreTranslate engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Absolute http(s) URL of the `/translate` endpoint
    pub server_url: String,
    /// GET query string or POST form body
    pub transport: Transport,
    /// Accepted `translatedText` layouts
    pub response_shape: ResponseShape,
    /// Sent as `api_key` when present
    pub api_key: Option<String>,
    /// Request timeout of the HTTP client
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_URL.to_string(),
            transport: Transport::default(),
            response_shape: ResponseShape::default(),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl TranslatorConfig {
    /// Config pointing at a specific server, everything else default
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            server_url: url.into(),
            ..Default::default()
        }
    }

    /// Resolve from the preference store
    pub fn from_preferences(prefs: &Preferences) -> Result<Self> {
        let server_url = prefs.get_preference_default(LIBRE_TRANSLATE_SERVER_URL, DEFAULT_URL);

        let transport = match prefs.get_preference(LIBRE_TRANSLATE_TRANSPORT) {
            s if s.is_empty() => Transport::default(),
            s => s.parse()?,
        };

        let response_shape = match prefs.get_preference(LIBRE_TRANSLATE_RESPONSE_SHAPE) {
            s if s.is_empty() => ResponseShape::default(),
            s => s.parse()?,
        };

        let api_key = Some(prefs.get_preference(LIBRE_TRANSLATE_API_KEY)).filter(|k| !k.is_empty());

        Ok(Self {
            server_url,
            transport,
            response_shape,
            api_key,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    /// Resolve from preferences, falling back to the environment for unset values
    pub fn load(prefs: &Preferences) -> Result<Self> {
        Self::from_sources(prefs, |name| std::env::var(name).ok())
    }

    /// Resolve from preferences plus a variable lookup. Stored values win;
    /// `LIBRE_TRANSLATE_URL` and `LIBRE_TRANSLATE_API_KEY` only fill in unset keys.
    pub fn from_sources<F>(prefs: &Preferences, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_preferences(prefs)?;

        if prefs.get_preference(LIBRE_TRANSLATE_SERVER_URL).trim().is_empty() {
            if let Some(url) = env("LIBRE_TRANSLATE_URL").filter(|u| !u.trim().is_empty()) {
                debug!("Server URL taken from LIBRE_TRANSLATE_URL");
                config.server_url = url;
            }
        }

        if config.api_key.is_none() {
            config.api_key = env("LIBRE_TRANSLATE_API_KEY").filter(|k| !k.is_empty());
        }

        if let Some(timeout) = env("LIBRE_TRANSLATE_TIMEOUT_MS") {
            config.timeout_ms = timeout.parse().map_err(|_| TranslationError::ConfigError {
                message: format!("Invalid LIBRE_TRANSLATE_TIMEOUT_MS: {}", timeout),
            })?;
        }

        Ok(config)
    }

    /// Validate configuration, substituting the default endpoint for an empty URL
    pub fn validate(&mut self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            warn!("Empty server URL, using {}", DEFAULT_URL);
            self.server_url = DEFAULT_URL.to_string();
        }

        let url = Url::parse(self.server_url.trim()).map_err(|e| TranslationError::ConfigError {
            message: format!("Invalid server URL {}: {}", self.server_url, e),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TranslationError::ConfigError {
                message: format!("Server URL must be http or https: {}", self.server_url),
            });
        }

        if self.timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_preferences() {
        let prefs = Preferences::in_memory();
        let config = TranslatorConfig::from_preferences(&prefs).unwrap();
        assert_eq!(config, TranslatorConfig::default());
        assert_eq!(config.server_url, "https://libretranslate.com/translate");
    }

    #[test]
    fn test_from_preferences() {
        let mut prefs = Preferences::in_memory();
        prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, "http://localhost:5000/translate");
        prefs.set_preference(LIBRE_TRANSLATE_TRANSPORT, "get");
        prefs.set_preference(LIBRE_TRANSLATE_RESPONSE_SHAPE, "list");
        prefs.set_preference(LIBRE_TRANSLATE_API_KEY, "secret");

        let config = TranslatorConfig::from_preferences(&prefs).unwrap();
        assert_eq!(config.server_url, "http://localhost:5000/translate");
        assert_eq!(config.transport, Transport::Get);
        assert_eq!(config.response_shape, ResponseShape::List);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_bad_transport_preference() {
        let mut prefs = Preferences::in_memory();
        prefs.set_preference(LIBRE_TRANSLATE_TRANSPORT, "carrier-pigeon");
        assert!(TranslatorConfig::from_preferences(&prefs).is_err());
    }

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "LIBRE_TRANSLATE_URL" => Some("http://env-host:9/translate".to_string()),
            "LIBRE_TRANSLATE_API_KEY" => Some("env-key".to_string()),
            "LIBRE_TRANSLATE_TIMEOUT_MS" => Some("5000".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_stored_url_beats_environment() {
        let mut prefs = Preferences::in_memory();
        prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, "http://localhost:5000/translate");
        prefs.set_preference(LIBRE_TRANSLATE_API_KEY, "stored-key");

        let config = TranslatorConfig::from_sources(&prefs, fake_env).unwrap();
        assert_eq!(config.server_url, "http://localhost:5000/translate");
        assert_eq!(config.api_key.as_deref(), Some("stored-key"));
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_environment_fills_unset_url() {
        let prefs = Preferences::in_memory();
        let config = TranslatorConfig::from_sources(&prefs, fake_env).unwrap();
        assert_eq!(config.server_url, "http://env-host:9/translate");
        assert_eq!(config.api_key.as_deref(), Some("env-key"));

        let config = TranslatorConfig::from_sources(&prefs, |_| None).unwrap();
        assert_eq!(config, TranslatorConfig::default());
    }

    #[test]
    fn test_bad_timeout_variable() {
        let prefs = Preferences::in_memory();
        let env = |name: &str| (name == "LIBRE_TRANSLATE_TIMEOUT_MS").then(|| "soon".to_string());
        assert!(TranslatorConfig::from_sources(&prefs, env).is_err());
    }

    #[test]
    fn test_validate_empty_url_uses_default() {
        let mut config = TranslatorConfig::with_url("");
        config.validate().unwrap();
        assert_eq!(config.server_url, DEFAULT_URL);
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let mut config = TranslatorConfig::with_url("/translate");
        assert!(config.validate().is_err());

        let mut config = TranslatorConfig::with_url("ftp://example.com/translate");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = TranslatorConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
