//! LibreTranslate machine-translation engine
//!
//! This library provides an asynchronous LibreTranslate client together with
//! the host pieces it plugs into: a preference store, a per-engine result
//! cache, an engine registry and a terminal configuration dialog.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod core;
pub mod cli;
pub mod ui;
pub mod utils;

// Re-export key types for convenience
pub use core::{
    cache::CachedTranslator,
    client::LibreTranslate,
    config::TranslatorConfig,
    engine::MachineTranslator,
    errors::TranslationError,
    models::{Language, ResponseShape, TranslationRequest, Transport},
    preferences::Preferences,
    registry::{load_plugins, unload_plugins, EngineRegistry},
};

pub use utils::clean_spaces_around_tags;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
