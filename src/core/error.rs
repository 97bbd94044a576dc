//! Error types for plugkit.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plugkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugkit operations.
#[derive(Error, Debug)]
pub enum Error {
    // Identity errors
    #[error("Invalid plugin name {0:?}")]
    InvalidPluginName(String),

    // Configuration errors
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    // Logging errors
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Logger not found: {0}")]
    LoggerNotFound(String),

    // Plugin errors
    #[error("Plugin {0} is already registered")]
    PluginAlreadyRegistered(String),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Plugin {name} failed to initialize: {message}")]
    PluginInit { name: String, message: String },

    #[error("Plugin {name} failed to close: {message}")]
    PluginClose { name: String, message: String },

    // Agent errors
    #[error("Agent already started")]
    AgentAlreadyStarted,

    #[error("Agent not started")]
    AgentNotStarted,
}
