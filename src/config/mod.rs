//! Config Module
//!
//! Provides per-plugin configuration:
//! - Config file location (`<name>.conf`)
//! - YAML loading into caller-defined types

pub mod loader;
pub mod source;

pub use loader::PluginConfig;
pub use source::{ConfigSource, CONFIG_DIR_ENV, CONFIG_SUFFIX};
