//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslationError;

/// A language as the host knows it, e.g. `en`, `EN`, `pt-BR` or `pt_BR`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    /// Locale identifier as given, trimmed
    locale: String,
}

impl Language {
    /// Wrap a locale identifier; surrounding whitespace is dropped
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into().trim().to_string(),
        }
    }

    /// Primary language subtag, lowercased (`pt-BR` -> `pt`)
    pub fn language_code(&self) -> String {
        self.locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locale)
    }
}

impl From<&str> for Language {
    fn from(locale: &str) -> Self {
        Self::new(locale)
    }
}

/// How the request parameters travel to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Query string on a GET request
    Get,
    /// `application/x-www-form-urlencoded` POST body
    #[default]
    Post,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Get => write!(f, "get"),
            Transport::Post => write!(f, "post"),
        }
    }
}

impl FromStr for Transport {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "get" => Ok(Transport::Get),
            "post" => Ok(Transport::Post),
            other => Err(TranslationError::ConfigError {
                message: format!("Unknown transport: {}", other),
            }),
        }
    }
}

/// Which `translatedText` layouts are accepted in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `{"translatedText": "..."}` or `{"translatedText": [{"text": "..."}]}`
    #[default]
    Auto,
    /// `{"translatedText": "..."}` only
    Flat,
    /// `{"translatedText": [{"text": "..."}]}` only
    List,
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseShape::Auto => write!(f, "auto"),
            ResponseShape::Flat => write!(f, "flat"),
            ResponseShape::List => write!(f, "list"),
        }
    }
}

impl FromStr for ResponseShape {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ResponseShape::Auto),
            "flat" => Ok(ResponseShape::Flat),
            "list" => Ok(ResponseShape::List),
            other => Err(TranslationError::ConfigError {
                message: format!("Unknown response shape: {}", other),
            }),
        }
    }
}

/// Translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Segment text, sent as `q`
    pub source_text: String,
    /// Lowercase source language code
    pub source_lang: String,
    /// Lowercase target language code
    pub target_lang: String,
}

impl TranslationRequest {
    /// Build a request, reducing both languages to their lowercase codes
    pub fn new(source: &Language, target: &Language, text: impl Into<String>) -> Self {
        Self {
            source_text: text.into(),
            source_lang: source.language_code(),
            target_lang: target.language_code(),
        }
    }
}
