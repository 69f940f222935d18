//! Capability interface implemented by machine-translation engines

use std::io::{BufRead, Write};

use crate::core::errors::Result;
use crate::core::models::Language;
use crate::core::preferences::Preferences;

/// A pluggable translation backend
#[async_trait::async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Preference key of the flag that switches this engine on
    fn preference_name(&self) -> &str;

    /// Whether [`MachineTranslator::show_configuration_ui`] does anything
    fn is_configurable(&self) -> bool {
        false
    }

    /// Translate one segment. `Ok(None)` means the server had nothing to return.
    async fn translate(
        &self,
        source: &Language,
        target: &Language,
        text: &str,
    ) -> Result<Option<String>>;

    /// Interactive configuration; engines without settings do nothing
    fn show_configuration_ui(
        &self,
        _prefs: &mut Preferences,
        _input: &mut dyn BufRead,
        _output: &mut dyn Write,
    ) -> Result<()> {
        Ok(())
    }
}
