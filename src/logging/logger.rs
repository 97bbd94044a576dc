//! Named, leveled loggers handed to plugins.
//!
//! Each [`Logger`] emits accepted entries as `tracing` events tagged with the
//! logger name and keeps a bounded ring of recent entries for inspection.
//!
//! Every event carries this module's path as its tracing target and the
//! plugin name only in the `logger` field, so `RUST_LOG` directives cannot
//! select a single plugin. Per-plugin filtering is done by logger levels,
//! set on the [`Logger`] or through the registry.

use crate::core::{now, Error, Result, Timestamp};
use crate::logging::registry::RegistryState;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Default number of entries kept per logger.
pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    #[serde(alias = "warning")]
    Warn = 3,
    /// Error level
    Error = 4,
    /// Fatal level
    Fatal = 5,
}

impl LogLevel {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Fatal => write!(f, "FATAL"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(Error::InvalidLogLevel(s.to_string())),
        }
    }
}

/// A structured log entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp
    pub timestamp: Timestamp,
    /// Log level
    pub level: LogLevel,
    /// Message
    pub message: String,
    /// Name of the logger that produced the entry
    pub target: String,
    /// Structured fields
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry.
    pub fn new(level: LogLevel, message: &str) -> Self {
        Self {
            timestamp: now(),
            level,
            message: message.to_string(),
            target: String::new(),
            fields: HashMap::new(),
        }
    }

    /// Set target.
    pub fn with_target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    /// Add a field. A value that cannot be represented as JSON is kept as
    /// the serialization error text.
    pub fn with_field(mut self, key: &str, value: impl Serialize) -> Self {
        let v = serde_json::to_value(value)
            .unwrap_or_else(|e| serde_json::Value::String(format!("<unserializable: {}>", e)));
        self.fields.insert(key.to_string(), v);
        self
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as text.
    pub fn to_text(&self) -> String {
        let fields_str = if self.fields.is_empty() {
            String::new()
        } else {
            format!(" {}", serde_json::to_string(&self.fields).unwrap_or_default())
        };

        format!(
            "{} {} [{}] {}{}",
            self.timestamp, self.level, self.target, self.message, fields_str
        )
    }
}

struct LoggerInner {
    name: String,
    level: AtomicU8,
    buffer: RwLock<VecDeque<LogEntry>>,
    max_buffer: usize,
    registry: Weak<RwLock<RegistryState>>,
}

/// Logger handle owned by a plugin.
///
/// Clones share the same name, level and buffer.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// Create a standalone logger that is not tracked by any registry.
    pub fn new(name: &str, level: LogLevel) -> Self {
        Self::with_registry(name, level, Weak::new())
    }

    pub(crate) fn with_registry(
        name: &str,
        level: LogLevel,
        registry: Weak<RwLock<RegistryState>>,
    ) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: name.to_string(),
                level: AtomicU8::new(level as u8),
                buffer: RwLock::new(VecDeque::new()),
                max_buffer: DEFAULT_BUFFER_SIZE,
                registry,
            }),
        }
    }

    /// Logger name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current minimum level.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.level.load(Ordering::Relaxed))
    }

    /// Set minimum level.
    pub fn set_level(&self, level: LogLevel) {
        self.inner.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether an entry at `level` would be accepted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Create a child logger named `<name>.<suffix>`.
    ///
    /// Children of registry loggers are registered too, so their level can be
    /// changed by name later on.
    pub fn child(&self, suffix: &str) -> Logger {
        let name = format!("{}.{}", self.inner.name, suffix);
        match self.inner.registry.upgrade() {
            Some(state) => RegistryState::get_or_create(&state, &name),
            None => Logger::new(&name, self.level()),
        }
    }

    /// Log an entry.
    pub fn log(&self, entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }

        let entry = if entry.target.is_empty() {
            entry.with_target(&self.inner.name)
        } else {
            entry
        };

        emit(&entry);

        let mut buffer = self
            .inner
            .buffer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if buffer.len() >= self.inner.max_buffer {
            buffer.pop_front();
        }
        buffer.push_back(entry);
    }

    /// Log a message with structured fields.
    pub fn log_with<I, K, V>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        if !self.enabled(level) {
            return;
        }
        let entry = fields
            .into_iter()
            .fold(LogEntry::new(level, message), |entry, (k, v)| {
                entry.with_field(k.as_ref(), v)
            });
        self.log(entry);
    }

    /// Log at trace level.
    pub fn trace(&self, message: &str) {
        self.log(LogEntry::new(LogLevel::Trace, message));
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogEntry::new(LogLevel::Debug, message));
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogEntry::new(LogLevel::Info, message));
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogEntry::new(LogLevel::Warn, message));
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogEntry::new(LogLevel::Error, message));
    }

    /// Log at fatal level. Does not terminate the process.
    pub fn fatal(&self, message: &str) {
        self.log(LogEntry::new(LogLevel::Fatal, message));
    }

    /// Recently accepted entries, oldest first.
    pub fn recent(&self) -> Vec<LogEntry> {
        self.inner
            .buffer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Recent entries at or above a level.
    pub fn recent_at_level(&self, min_level: LogLevel) -> Vec<LogEntry> {
        self.inner
            .buffer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|e| e.level >= min_level)
            .cloned()
            .collect()
    }

    /// Clear the buffer.
    pub fn clear(&self) {
        self.inner
            .buffer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &self.level())
            .finish()
    }
}

/// Forward an entry to `tracing`. The target is always this module; the
/// logger name travels in the `logger` field.
fn emit(entry: &LogEntry) {
    let fields = if entry.fields.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&entry.fields).unwrap_or_default()
    };
    let logger = entry.target.as_str();
    let message = entry.message.as_str();

    match entry.level {
        LogLevel::Trace => tracing::trace!(logger, fields = %fields, "{}", message),
        LogLevel::Debug => tracing::debug!(logger, fields = %fields, "{}", message),
        LogLevel::Info => tracing::info!(logger, fields = %fields, "{}", message),
        LogLevel::Warn => tracing::warn!(logger, fields = %fields, "{}", message),
        LogLevel::Error => tracing::error!(logger, fields = %fields, "{}", message),
        LogLevel::Fatal => tracing::error!(logger, fatal = true, fields = %fields, "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry() {
        let entry = LogEntry::new(LogLevel::Info, "Test message")
            .with_target("test::module")
            .with_field("user_id", "123");

        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "Test message");
        assert_eq!(entry.target, "test::module");
        assert!(entry.fields.contains_key("user_id"));
    }

    #[test]
    fn test_unserializable_field_is_kept() {
        let bad: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let entry = LogEntry::new(LogLevel::Info, "Test").with_field("pairs", bad);

        let value = entry.fields.get("pairs").unwrap();
        assert!(value.as_str().unwrap().starts_with("<unserializable:"));
    }

    #[test]
    fn test_log_format() {
        let entry = LogEntry::new(LogLevel::Info, "Test").with_target("helloworld");

        let json = entry.to_json();
        assert!(json.contains("\"level\":\"info\""));

        let text = entry.to_text();
        assert!(text.contains("INFO [helloworld] Test"));
    }

    #[test]
    fn test_logger() {
        let logger = Logger::new("helloworld", LogLevel::Info);
        logger.info("Info message");
        logger.warn("Warning message");
        logger.error("Error message");

        let logs = logger.recent();
        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(|e| e.target == "helloworld"));
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = Logger::new("filtered", LogLevel::Warn);

        logger.info("Should be filtered");
        logger.warn("Should appear");
        logger.error("Should appear");

        assert_eq!(logger.recent().len(), 2);

        logger.set_level(LogLevel::Debug);
        logger.debug("Now visible");
        assert_eq!(logger.recent().len(), 3);
    }

    #[test]
    fn test_recent_at_level() {
        let logger = Logger::new("levels", LogLevel::Info);
        logger.info("Info");
        logger.warn("Warn");
        logger.error("Error");

        assert_eq!(logger.recent_at_level(LogLevel::Error).len(), 1);
        assert_eq!(logger.recent_at_level(LogLevel::Warn).len(), 2);

        logger.clear();
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn test_buffer_is_bounded() {
        let logger = Logger::new("bounded", LogLevel::Trace);
        for i in 0..DEFAULT_BUFFER_SIZE + 10 {
            logger.trace(&format!("entry {}", i));
        }

        let logs = logger.recent();
        assert_eq!(logs.len(), DEFAULT_BUFFER_SIZE);
        assert_eq!(logs[0].message, "entry 10");
    }

    #[test]
    fn test_log_with_fields() {
        let logger = Logger::new("fields", LogLevel::Info);
        logger.log_with(LogLevel::Info, "Loaded config", [("found", true)]);

        let logs = logger.recent();
        assert_eq!(logs[0].fields.get("found"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_fatal_does_not_exit() {
        let logger = Logger::new("fatal", LogLevel::Info);
        logger.fatal("still running");
        assert_eq!(logger.recent_at_level(LogLevel::Fatal).len(), 1);
    }

    #[test]
    fn test_standalone_child() {
        let logger = Logger::new("parent", LogLevel::Warn);
        let child = logger.child("sub");
        assert_eq!(child.name(), "parent.sub");
        assert_eq!(child.level(), LogLevel::Warn);
    }

    #[test]
    fn test_clones_share_state() {
        let logger = Logger::new("shared", LogLevel::Info);
        let clone = logger.clone();
        clone.set_level(LogLevel::Error);
        clone.error("from clone");

        assert_eq!(logger.level(), LogLevel::Error);
        assert_eq!(logger.recent().len(), 1);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());

        let level: LogLevel = serde_yaml::from_str("error").unwrap();
        assert_eq!(level, LogLevel::Error);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }
}
