//! Plugin interface definition.
//!
//! Defines the lifecycle every plugin implements.

use crate::core::Error;
use crate::plugin::name::PluginName;

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Plugin-specific error.
#[derive(Clone, Debug)]
pub struct PluginError {
    /// Error message
    pub message: String,
    /// Is recoverable
    pub recoverable: bool,
}

impl PluginError {
    /// Create a new error.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            recoverable: true,
        }
    }

    /// Create a fatal error.
    pub fn fatal(message: &str) -> Self {
        Self {
            message: message.to_string(),
            recoverable: false,
        }
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginError: {}", self.message)
    }
}

impl std::error::Error for PluginError {}

impl From<Error> for PluginError {
    fn from(err: Error) -> Self {
        PluginError::new(&err.to_string())
    }
}

/// Plugin trait that all plugins must implement.
///
/// The agent calls `init` on every plugin in registration order, then
/// `after_init` in the same order, and `close` in reverse order on shutdown.
pub trait Plugin: Send {
    /// Plugin name.
    fn name(&self) -> &PluginName;

    /// Initialize the plugin.
    fn init(&mut self) -> PluginResult<()>;

    /// Called once every plugin has been initialized.
    fn after_init(&mut self) -> PluginResult<()> {
        Ok(())
    }

    /// Close the plugin and release its resources.
    fn close(&mut self) -> PluginResult<()>;

    /// Health check.
    fn health_check(&self) -> PluginResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_error_from_core_error() {
        let err: PluginError = Error::InvalidPluginName(String::new()).into();
        assert!(err.recoverable);
        assert!(err.message.contains("Invalid plugin name"));
    }

    #[test]
    fn test_fatal_error() {
        let err = PluginError::fatal("disk gone");
        assert!(!err.recoverable);
        assert_eq!(err.to_string(), "PluginError: disk gone");
    }
}
