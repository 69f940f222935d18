//! Terminal user interface pieces used by configurable engines

pub mod dialog;

pub use dialog::{ConfigDialog, ConfigPanel};
