//! Host-side translation cache and enable gate

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::engine::MachineTranslator;
use crate::core::errors::Result;
use crate::core::models::Language;
use crate::core::preferences::Preferences;

/// Language codes plus source text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Source language code
    source: String,
    /// Target language code
    target: String,
    /// Source segment
    text: String,
}

impl CacheKey {
    /// Key for one segment and language pair
    fn new(source: &Language, target: &Language, text: &str) -> Self {
        Self {
            source: source.language_code(),
            target: target.language_code(),
            text: text.to_string(),
        }
    }
}

/// Caches the results of one engine; skips the engine entirely while disabled
#[derive(Clone)]
pub struct CachedTranslator {
    /// Wrapped engine
    engine: Arc<dyn MachineTranslator>,
    /// Enable gate shared between clones
    enabled: Arc<AtomicBool>,
    /// Successful translations
    cache: Arc<RwLock<HashMap<CacheKey, String>>>,
}

impl CachedTranslator {
    /// Wrap `engine` with an empty cache
    pub fn new(engine: Arc<dyn MachineTranslator>, enabled: bool) -> Self {
        Self {
            engine,
            enabled: Arc::new(AtomicBool::new(enabled)),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Enable flag taken from the engine's preference key
    pub fn from_preferences(engine: Arc<dyn MachineTranslator>, prefs: &Preferences) -> Self {
        let enabled = prefs.is_preference(engine.preference_name());
        Self::new(engine, enabled)
    }

    /// Whether lookups may reach the engine
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Switch the engine on or off at runtime
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        info!(
            "{} {}",
            self.engine.name(),
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Cached result if present, otherwise ask the engine and remember the answer.
    /// Returns `Ok(None)` while disabled. Errors are passed through uncached.
    pub async fn get_translation(
        &self,
        source: &Language,
        target: &Language,
        text: &str,
    ) -> Result<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let key = CacheKey::new(source, target, text);
        if let Some(hit) = self.cache.read().await.get(&key) {
            debug!("Cache hit for {} -> {}", key.source, key.target);
            return Ok(Some(hit.clone()));
        }

        let result = self.engine.translate(source, target, text).await?;
        if let Some(translation) = &result {
            self.cache.write().await.insert(key, translation.clone());
        }
        Ok(result)
    }

    /// Cache lookup only, never touches the network
    pub async fn get_cached_translation(
        &self,
        source: &Language,
        target: &Language,
        text: &str,
    ) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let key = CacheKey::new(source, target, text);
        self.cache.read().await.get(&key).cloned()
    }

    /// Number of cached translations
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// True when nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Drop every cached translation
    pub async fn clear(&self) {
        self.cache.write().await.clear();
        debug!("Cleared {} cache", self.engine.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::TranslationError;
    use std::sync::atomic::AtomicUsize;

    /// Upper-cases its input, or fails when the text is "fail"
    struct CountingEngine {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MachineTranslator for CountingEngine {
        fn name(&self) -> &str {
            "counting"
        }

        fn preference_name(&self) -> &str {
            "allow.counting"
        }

        async fn translate(
            &self,
            _source: &Language,
            _target: &Language,
            text: &str,
        ) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match text {
                "fail" => Err(TranslationError::JsonParse),
                "" => Ok(None),
                _ => Ok(Some(text.to_uppercase())),
            }
        }
    }

    fn engine() -> Arc<CountingEngine> {
        Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_repeated_segment_hits_cache() {
        let inner = engine();
        let cached = CachedTranslator::new(inner.clone(), true);

        let en = Language::new("en");
        let es = Language::new("es");
        assert_eq!(cached.get_translation(&en, &es, "hola").await.unwrap().as_deref(), Some("HOLA"));
        assert_eq!(cached.get_translation(&en, &es, "hola").await.unwrap().as_deref(), Some("HOLA"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        // different language pair is a different entry
        cached.get_translation(&en, &Language::new("fr"), "hola").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.len().await, 2);
    }

    #[tokio::test]
    async fn test_disabled_engine_is_not_called() {
        let inner = engine();
        let cached = CachedTranslator::new(inner.clone(), false);

        let result = cached
            .get_translation(&"en".into(), &"es".into(), "hola")
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_errors_and_empty_results_are_not_cached() {
        let inner = engine();
        let cached = CachedTranslator::new(inner.clone(), true);
        let (en, es) = (Language::new("en"), Language::new("es"));

        assert!(cached.get_translation(&en, &es, "fail").await.is_err());
        assert!(cached.get_translation(&en, &es, "fail").await.is_err());
        assert_eq!(cached.get_translation(&en, &es, "").await.unwrap(), None);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
        assert!(cached.is_empty().await);
    }

    #[tokio::test]
    async fn test_cached_lookup_and_clear() {
        let cached = CachedTranslator::new(engine(), true);
        let (en, es) = (Language::new("en"), Language::new("es"));

        assert_eq!(cached.get_cached_translation(&en, &es, "hola").await, None);
        cached.get_translation(&en, &es, "hola").await.unwrap();
        assert_eq!(
            cached.get_cached_translation(&en, &es, "hola").await.as_deref(),
            Some("HOLA")
        );

        cached.clear().await;
        assert_eq!(cached.get_cached_translation(&en, &es, "hola").await, None);
    }

    #[tokio::test]
    async fn test_enable_flag_from_preferences() {
        let mut prefs = Preferences::in_memory();
        let cached = CachedTranslator::from_preferences(engine(), &prefs);
        assert!(!cached.is_enabled());

        prefs.set_preference("allow.counting", true);
        let cached = CachedTranslator::from_preferences(engine(), &prefs);
        assert!(cached.is_enabled());

        cached.set_enabled(false);
        assert!(!cached.is_enabled());
    }
}
