//! # plugkit - plugin dependency injection
//!
//! Supplies agent plugins with their shared collaborators:
//! - **Name**: a validated plugin identity
//! - **Logger**: a leveled logger named after the plugin
//! - **Config**: a loader for the plugin's `<name>.conf` YAML file
//!
//! plus a small [`agent::Agent`] that initializes plugins, waits for an
//! interrupt and closes them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plugkit::agent::Agent;
//! use plugkit::plugin::{Plugin, PluginDeps, PluginName, PluginResult};
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize)]
//! struct Config {
//!     greeting: String,
//! }
//!
//! struct HelloWorld {
//!     deps: PluginDeps,
//!     config: Config,
//! }
//!
//! impl Plugin for HelloWorld {
//!     fn name(&self) -> &PluginName {
//!         self.deps.plugin_name()
//!     }
//!
//!     fn init(&mut self) -> PluginResult<()> {
//!         if !self.deps.cfg.load_into(&mut self.config)? {
//!             self.deps.log.warn("Config not found, using defaults");
//!         }
//!         self.deps.log.info(&self.config.greeting);
//!         Ok(())
//!     }
//!
//!     fn close(&mut self) -> PluginResult<()> {
//!         self.deps.log.info("Goodbye");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> plugkit::Result<()> {
//!     let plugin = HelloWorld {
//!         deps: PluginDeps::new("helloworld")?,
//!         config: Config::default(),
//!     };
//!     let mut agent = Agent::new().with_plugin(Box::new(plugin))?;
//!     agent.run().await
//! }
//! ```

pub mod agent;
pub mod config;
pub mod core;
pub mod logging;
pub mod plugin;

pub use core::error::{Error, Result};
