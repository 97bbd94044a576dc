//! Process-wide logger registry.
//!
//! Loggers are created on demand by name. Levels can be changed by name at any
//! time, either directly or from a `logs.conf` document.

use crate::config::PluginConfig;
use crate::core::{Error, Result};
use crate::logging::logger::{LogLevel, Logger};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, RwLock};

/// Environment variable holding the initial default level.
pub const INITIAL_LEVEL_ENV: &str = "INITIAL_LOGLVL";

/// Plugin name under which the registry looks for its own config file.
pub const LOGS_CONFIG_NAME: &str = "logs";

static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();

pub(crate) struct RegistryState {
    default_level: LogLevel,
    loggers: HashMap<String, Logger>,
}

impl RegistryState {
    pub(crate) fn get_or_create(state: &Arc<RwLock<RegistryState>>, name: &str) -> Logger {
        if let Some(logger) = state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .loggers
            .get(name)
        {
            return logger.clone();
        }

        let mut guard = state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let level = guard.default_level;
        guard
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| Logger::with_registry(name, level, Arc::downgrade(state)))
            .clone()
    }
}

/// Per-logger level entry of [`LogsConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerLevel {
    /// Logger name
    pub name: String,
    /// Level to apply
    pub level: LogLevel,
}

/// Contents of `logs.conf`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LogsConfig {
    /// Level for loggers created from now on
    #[serde(default)]
    pub default_level: Option<LogLevel>,
    /// Explicit per-logger levels
    #[serde(default)]
    pub loggers: Vec<LoggerLevel>,
}

/// Registry of named loggers.
#[derive(Clone)]
pub struct LoggerRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl LoggerRegistry {
    /// Create an empty registry.
    pub fn new(default_level: LogLevel) -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState {
                default_level,
                loggers: HashMap::new(),
            })),
        }
    }

    /// Create a registry whose default level comes from `INITIAL_LOGLVL`.
    ///
    /// Unset or unparsable values fall back to `Info`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup(INITIAL_LEVEL_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or(LogLevel::Info);
        Self::new(level)
    }

    /// The process-wide registry.
    pub fn global() -> &'static LoggerRegistry {
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Return the logger named `name`, creating it at the default level.
    pub fn get_or_create(&self, name: &str) -> Logger {
        RegistryState::get_or_create(&self.state, name)
    }

    /// Look up an existing logger.
    pub fn get(&self, name: &str) -> Option<Logger> {
        self.read().loggers.get(name).cloned()
    }

    /// Change the level of an existing logger.
    pub fn set_level(&self, name: &str, level: LogLevel) -> Result<()> {
        let logger = self
            .get(name)
            .ok_or_else(|| Error::LoggerNotFound(name.to_string()))?;
        logger.set_level(level);
        Ok(())
    }

    /// Levels of all registered loggers, sorted by name.
    pub fn levels(&self) -> BTreeMap<String, LogLevel> {
        self.read()
            .loggers
            .iter()
            .map(|(name, logger)| (name.clone(), logger.level()))
            .collect()
    }

    /// Level given to newly created loggers.
    pub fn default_level(&self) -> LogLevel {
        self.read().default_level
    }

    /// Change the level for loggers created from now on.
    pub fn set_default_level(&self, level: LogLevel) {
        self.write().default_level = level;
    }

    /// Number of registered loggers.
    pub fn len(&self) -> usize {
        self.read().loggers.len()
    }

    /// Whether no logger has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a logs configuration, creating loggers that do not exist yet.
    pub fn apply(&self, config: &LogsConfig) {
        if let Some(level) = config.default_level {
            self.set_default_level(level);
        }
        for entry in &config.loggers {
            self.get_or_create(&entry.name).set_level(entry.level);
        }
    }

    /// Load `logs.conf` through `cfg` and apply it. Returns whether it was found.
    pub fn load_config(&self, cfg: &PluginConfig) -> Result<bool> {
        match cfg.load_value::<LogsConfig>()? {
            Some(config) => {
                self.apply(&config);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("default_level", &self.default_level())
            .field("loggers", &self.levels())
            .finish()
    }
}
