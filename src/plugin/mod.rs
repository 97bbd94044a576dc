//! Plugin Module
//!
//! Provides the plugin side of the toolkit:
//! - Plugin identity
//! - Injected dependencies (name, logger, config)
//! - Plugin interface
//! - Plugin registry

pub mod deps;
pub mod interface;
pub mod name;
pub mod registry;

pub use deps::{PluginDeps, PluginDepsBuilder};
pub use interface::{Plugin, PluginError, PluginResult};
pub use name::PluginName;
pub use registry::{PluginRegistry, PluginStatus, RegisteredPlugin};
