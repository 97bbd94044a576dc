//! Logging Module
//!
//! Provides plugin loggers:
//! - Leveled, named logger handles
//! - Process-wide logger registry
//! - Tracing subscriber setup

pub mod logger;
pub mod registry;
pub mod subscriber;

pub use logger::{LogEntry, LogLevel, Logger};
pub use registry::{LoggerLevel, LoggerRegistry, LogsConfig};
pub use subscriber::init_tracing;
