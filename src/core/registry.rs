//! Registry of available machine-translation engines

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::client::{LibreTranslate, ENGINE_NAME};
use crate::core::engine::MachineTranslator;
use crate::core::errors::Result;
use crate::core::preferences::Preferences;

/// Builds an engine from the current preferences
pub type EngineFactory = fn(&Preferences) -> Result<Arc<dyn MachineTranslator>>;

/// Named engine factories, in registration order
#[derive(Default)]
pub struct EngineRegistry {
    /// Name and factory pairs
    factories: Vec<(String, EngineFactory)>,
}

impl EngineRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory; a second registration under the same name replaces the first
    pub fn register(&mut self, name: &str, factory: EngineFactory) {
        if let Some(slot) = self.factories.iter_mut().find(|(n, _)| n == name) {
            warn!("Engine {} registered twice, replacing", name);
            slot.1 = factory;
            return;
        }
        info!("Registered engine {}", name);
        self.factories.push((name.to_string(), factory));
    }

    /// Remove a factory; returns whether one was registered
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.factories.len();
        self.factories.retain(|(n, _)| n != name);
        before != self.factories.len()
    }

    /// Registered engine names
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Build one engine by name
    pub fn create(&self, name: &str, prefs: &Preferences) -> Option<Result<Arc<dyn MachineTranslator>>> {
        self.factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory(prefs))
    }

    /// Build every registered engine
    pub fn create_all(&self, prefs: &Preferences) -> Result<Vec<Arc<dyn MachineTranslator>>> {
        self.factories.iter().map(|(_, factory)| factory(prefs)).collect()
    }
}

/// Factory for [`LibreTranslate`]
fn libre_translate_factory(prefs: &Preferences) -> Result<Arc<dyn MachineTranslator>> {
    Ok(Arc::new(LibreTranslate::from_preferences(prefs)?))
}

/// Register the LibreTranslate engine
pub fn load_plugins(registry: &mut EngineRegistry) {
    registry.register(ENGINE_NAME, libre_translate_factory);
}

/// Remove the LibreTranslate engine
pub fn unload_plugins(registry: &mut EngineRegistry) {
    registry.unregister(ENGINE_NAME);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::LIBRE_TRANSLATE_SERVER_URL;

    #[test]
    fn test_load_and_unload() {
        let mut registry = EngineRegistry::new();
        load_plugins(&mut registry);
        load_plugins(&mut registry);
        assert_eq!(registry.names(), vec!["Libre Translate"]);

        unload_plugins(&mut registry);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_create_uses_preferences() {
        let mut registry = EngineRegistry::new();
        load_plugins(&mut registry);

        let mut prefs = Preferences::in_memory();
        prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, "http://localhost:5000/translate");

        let engine = registry.create("Libre Translate", &prefs).unwrap().unwrap();
        assert_eq!(engine.preference_name(), "allow.libre.translate");
        assert!(engine.is_configurable());
        assert!(registry.create("Nonexistent", &prefs).is_none());

        assert_eq!(registry.create_all(&prefs).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_preferences_fail_creation() {
        let mut registry = EngineRegistry::new();
        load_plugins(&mut registry);

        let mut prefs = Preferences::in_memory();
        prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, "no-scheme");
        assert!(registry.create_all(&prefs).is_err());
    }
}
