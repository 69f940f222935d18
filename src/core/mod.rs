//! Core translation engine module

pub mod cache;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod preferences;
pub mod registry;
