//! LibreTranslate engine: request building, HTTP call and response parsing

use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::engine::MachineTranslator;
use crate::core::errors::{Result, TranslationError, JSON_ERROR_MESSAGE};
use crate::core::models::{Language, ResponseShape, TranslationRequest, Transport};
use crate::core::preferences::{Preferences, ALLOW_LIBRE_TRANSLATE, LIBRE_TRANSLATE_SERVER_URL};
use crate::ui::dialog::{ConfigDialog, ConfigPanel};
use crate::utils::tags::clean_spaces_around_tags;

/// Display name of the engine
pub const ENGINE_NAME: &str = "Libre Translate";

/// Label of the dialog's URL field
const SERVER_URL_LABEL: &str = "Server URL";

/// Client for a LibreTranslate-compatible `/translate` endpoint
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    /// Shared HTTP client carrying the timeout
    client: reqwest::Client,
    /// Validated endpoint
    server_url: String,
    /// Settings the engine was built from
    config: TranslatorConfig,
}

impl LibreTranslate {
    /// Create an engine from a resolved configuration
    pub fn new(mut config: TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            server_url: config.server_url.trim().to_string(),
            config,
        })
    }

    /// Create from the preference store; the environment only fills unset keys
    pub fn from_preferences(prefs: &Preferences) -> Result<Self> {
        Self::new(TranslatorConfig::load(prefs)?)
    }

    /// Create against a specific server with default settings
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Self::new(TranslatorConfig::with_url(url))
    }

    /// Endpoint this engine sends requests to
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Re-read configuration after the preferences changed
    pub fn reconfigure(&mut self, prefs: &Preferences) -> Result<()> {
        *self = Self::from_preferences(prefs)?;
        info!("Reconfigured {} for {}", ENGINE_NAME, self.server_url);
        Ok(())
    }

    /// Request parameters, ordered by key
    fn build_params(&self, request: &TranslationRequest) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("q", request.source_text.clone());
        params.insert("source", request.source_lang.clone());
        params.insert("target", request.target_lang.clone());
        if let Some(key) = &self.config.api_key {
            params.insert("api_key", key.clone());
        }
        params
    }

    /// Send the request and return the raw response body
    async fn send_request(&self, request: &TranslationRequest) -> Result<String> {
        let params = self.build_params(request);

        let builder = match self.config.transport {
            Transport::Get => self.client.get(&self.server_url).query(&params),
            Transport::Post => self.client.post(&self.server_url).form(&params),
        };

        debug!(
            "{} {} ({} -> {})",
            self.config.transport, self.server_url, request.source_lang, request.target_lang
        );

        let response = builder
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        if status.is_success() {
            return Ok(body);
        }

        // LibreTranslate reports failures as {"error": "..."}
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"].as_str().map(|s| s.to_string()))
            .unwrap_or(body);

        warn!("{} returned {}: {}", self.server_url, status, message);
        Err(TranslationError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    /// Extract the translation from a response body.
    ///
    /// Returns `Ok(None)` when the server sent `"translatedText": null`
    /// and the configured shape allows a flat value.
    pub fn get_json_results(&self, json: &str) -> Result<Option<String>> {
        let root: Value = match serde_json::from_str(json) {
            Ok(root) => root,
            Err(e) => {
                error!(cause = %e, "{}", JSON_ERROR_MESSAGE);
                return Err(TranslationError::JsonParse);
            }
        };

        let shape = self.config.response_shape;
        let accepts_flat = matches!(shape, ResponseShape::Auto | ResponseShape::Flat);
        let accepts_list = matches!(shape, ResponseShape::Auto | ResponseShape::List);

        match root.get("translatedText") {
            Some(Value::String(text)) if accepts_flat => return Ok(Some(text.clone())),
            Some(Value::Null) if accepts_flat => {
                debug!("Server returned an empty translation");
                return Ok(None);
            }
            Some(Value::Array(items)) if accepts_list => {
                if let Some(text) = items
                    .first()
                    .and_then(|item| item.get("text"))
                    .and_then(Value::as_str)
                {
                    return Ok(Some(text.to_string()));
                }
            }
            _ => {}
        }

        error!(shape = %shape, "{}", JSON_ERROR_MESSAGE);
        Err(TranslationError::JsonParse)
    }
}

#[async_trait::async_trait]
impl MachineTranslator for LibreTranslate {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn preference_name(&self) -> &str {
        ALLOW_LIBRE_TRANSLATE
    }

    fn is_configurable(&self) -> bool {
        true
    }

    async fn translate(
        &self,
        source: &Language,
        target: &Language,
        text: &str,
    ) -> Result<Option<String>> {
        let request = TranslationRequest::new(source, target, text);
        let body = self.send_request(&request).await?;

        Ok(self
            .get_json_results(&body)?
            .map(|translated| clean_spaces_around_tags(&translated, text)))
    }

    fn show_configuration_ui(
        &self,
        prefs: &mut Preferences,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<()> {
        let current = prefs.get_preference(LIBRE_TRANSLATE_SERVER_URL);

        let mut dialog = ConfigDialog::new(self.name(), |panel: &ConfigPanel| {
            let url = panel.value_field1.trim();
            if !url.is_empty() {
                TranslatorConfig::with_url(url).validate()?;
            }
            prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, url);
            prefs.save()
        });

        dialog.panel.value_label1 = SERVER_URL_LABEL.to_string();
        dialog.panel.value_field1 = current;
        dialog.panel.value_label2 = String::new();
        dialog.panel.set_field2_visible(false);

        if dialog.show(input, output)? {
            info!("{} server URL updated", ENGINE_NAME);
        }
        Ok(())
    }
}
