//! Plugin registry for managing plugins.
//!
//! Keeps plugins in registration order and tracks their lifecycle status.

use crate::core::{now, Error, Result, Timestamp};
use crate::plugin::interface::{Plugin, PluginError};
use std::collections::HashMap;

/// Plugin status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginStatus {
    /// Registered but not initialized
    Registered,
    /// `init` succeeded
    Initialized,
    /// `after_init` succeeded
    Active,
    /// Closed
    Closed,
    /// Error state
    Failed(String),
}

/// Registered plugin entry.
pub struct RegisteredPlugin {
    /// Plugin instance
    pub plugin: Box<dyn Plugin>,
    /// Current status
    pub status: PluginStatus,
    /// `init` succeeded and `close` has not been called since
    pub open: bool,
    /// Registration time
    pub registered_at: Timestamp,
}

/// Plugin registry.
#[derive(Default)]
pub struct PluginRegistry {
    /// Registered plugins, in registration order
    plugins: Vec<RegisteredPlugin>,
}

impl PluginRegistry {
    /// Create a new registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        let name = plugin.name().as_str().to_string();

        if self.position(&name).is_some() {
            return Err(Error::PluginAlreadyRegistered(name));
        }

        self.plugins.push(RegisteredPlugin {
            plugin,
            status: PluginStatus::Registered,
            open: false,
            registered_at: now(),
        });

        Ok(())
    }

    /// Unregister a plugin, returning it.
    pub fn unregister(&mut self, name: &str) -> Result<Box<dyn Plugin>> {
        let index = self.index(name)?;
        Ok(self.plugins.remove(index).plugin)
    }

    /// Initialize a plugin.
    pub fn init_plugin(&mut self, name: &str) -> Result<()> {
        let entry = self.entry_mut(name)?;
        let result = entry.plugin.init();
        entry.open = result.is_ok();
        Self::transition(entry, result, PluginStatus::Initialized).map_err(|e| {
            Error::PluginInit {
                name: name.to_string(),
                message: e.message,
            }
        })
    }

    /// Run the post-initialization step of a plugin.
    pub fn after_init_plugin(&mut self, name: &str) -> Result<()> {
        let entry = self.entry_mut(name)?;
        let result = entry.plugin.after_init();
        Self::transition(entry, result, PluginStatus::Active).map_err(|e| Error::PluginInit {
            name: name.to_string(),
            message: e.message,
        })
    }

    /// Close a plugin.
    pub fn close_plugin(&mut self, name: &str) -> Result<()> {
        let entry = self.entry_mut(name)?;
        let result = entry.plugin.close();
        entry.open = false;
        Self::transition(entry, result, PluginStatus::Closed).map_err(|e| Error::PluginClose {
            name: name.to_string(),
            message: e.message,
        })
    }

    /// Get plugin by name.
    pub fn get_plugin(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.plugins
            .iter()
            .find(|p| p.plugin.name().as_str() == name)
    }

    /// Whether a plugin was initialized and still needs `close`, whatever
    /// its current status.
    pub fn needs_close(&self, name: &str) -> bool {
        self.get_plugin(name).map(|p| p.open).unwrap_or(false)
    }

    /// Get plugin status.
    pub fn get_status(&self, name: &str) -> Option<&PluginStatus> {
        self.get_plugin(name).map(|p| &p.status)
    }

    /// Plugin names in registration order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins
            .iter()
            .map(|p| p.plugin.name().to_string())
            .collect()
    }

    /// Names of active plugins.
    pub fn active_plugins(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|p| p.status == PluginStatus::Active)
            .map(|p| p.plugin.name().to_string())
            .collect()
    }

    /// Get plugin count.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Health check all plugins.
    pub fn health_check_all(&self) -> HashMap<String, bool> {
        self.plugins
            .iter()
            .map(|entry| {
                let healthy = entry.plugin.health_check().unwrap_or(false);
                (entry.plugin.name().to_string(), healthy)
            })
            .collect()
    }

    fn transition(
        entry: &mut RegisteredPlugin,
        result: std::result::Result<(), PluginError>,
        next: PluginStatus,
    ) -> std::result::Result<(), PluginError> {
        match result {
            Ok(()) => {
                entry.status = next;
                Ok(())
            }
            Err(e) => {
                entry.status = PluginStatus::Failed(e.message.clone());
                Err(e)
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.plugins
            .iter()
            .position(|p| p.plugin.name().as_str() == name)
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| Error::PluginNotFound(name.to_string()))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut RegisteredPlugin> {
        let index = self.index(name)?;
        Ok(&mut self.plugins[index])
    }
}
