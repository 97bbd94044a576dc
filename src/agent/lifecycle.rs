//! Agent lifecycle.
//!
//! The agent owns the plugins, initializes them in registration order, waits
//! for an interrupt and closes them in reverse order.

use crate::core::{Error, Result};
use crate::logging::{Logger, LoggerRegistry};
use crate::plugin::{Plugin, PluginRegistry};
use std::sync::Arc;
use tokio::sync::Notify;

/// Name of the agent's own logger.
pub const AGENT_LOGGER: &str = "agent";

/// Handle used to stop a running agent from elsewhere.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    /// Ask the agent to shut down. Takes effect even if called before `run`
    /// starts waiting.
    pub fn shutdown(&self) {
        self.notify.notify_one();
    }
}

/// Plugin host.
pub struct Agent {
    /// Plugins in registration order
    registry: PluginRegistry,
    /// Agent logger
    log: Logger,
    /// Shutdown trigger
    shutdown: Arc<Notify>,
    /// Whether `start` has completed
    started: bool,
}

impl Agent {
    /// Create an agent logging through the global registry.
    pub fn new() -> Self {
        Self::with_logger(LoggerRegistry::global().get_or_create(AGENT_LOGGER))
    }

    /// Create an agent with an explicit logger.
    pub fn with_logger(log: Logger) -> Self {
        Self {
            registry: PluginRegistry::new(),
            log,
            shutdown: Arc::new(Notify::new()),
            started: false,
        }
    }

    /// Register a plugin, builder style.
    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Result<Self> {
        self.register(plugin)?;
        Ok(self)
    }

    /// Register a plugin.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        if self.started {
            return Err(Error::AgentAlreadyStarted);
        }
        self.registry.register(plugin)
    }

    /// Plugin registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Agent logger.
    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// Whether the agent is started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Handle that stops [`Agent::run`].
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            notify: Arc::clone(&self.shutdown),
        }
    }

    /// Initialize all plugins, then run their post-init step.
    ///
    /// On failure every plugin initialized so far is closed again, in reverse
    /// order, before the error is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(Error::AgentAlreadyStarted);
        }

        let names = self.registry.plugin_names();
        self.log.info(&format!("Starting agent with {} plugins", names.len()));

        for name in &names {
            if let Err(e) = self.registry.init_plugin(name) {
                return Err(self.abort_start(e));
            }
            self.log.debug(&format!("Plugin {} initialized", name));
        }

        for name in &names {
            if let Err(e) = self.registry.after_init_plugin(name) {
                return Err(self.abort_start(e));
            }
        }

        self.started = true;
        self.log.info("Agent started");
        Ok(())
    }

    /// Close all initialized plugins in reverse order.
    ///
    /// Every plugin is attempted; the first failure is returned.
    pub fn stop(&mut self) -> Result<()> {
        if !self.started {
            return Err(Error::AgentNotStarted);
        }
        self.started = false;

        match self.close_initialized() {
            Some(e) => Err(e),
            None => {
                self.log.info("Agent stopped");
                Ok(())
            }
        }
    }

    /// Start, wait for Ctrl-C or a [`ShutdownHandle`], then stop.
    pub async fn run(&mut self) -> Result<()> {
        self.start()?;

        let shutdown = Arc::clone(&self.shutdown);
        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => self.log.info("Signal interrupt received, stopping agent"),
                Err(e) => self.log.error(&format!("Failed to listen for interrupt: {}", e)),
            },
            _ = shutdown.notified() => self.log.info("Shutdown requested, stopping agent"),
        }

        self.stop()
    }

    fn abort_start(&mut self, err: Error) -> Error {
        self.log.error(&format!("Agent failed to start: {}", err));
        if let Some(close_err) = self.close_initialized() {
            self.log.warn(&format!("Cleanup after failed start: {}", close_err));
        }
        err
    }

    fn close_initialized(&mut self) -> Option<Error> {
        let mut first_error = None;
        for name in self.registry.plugin_names().iter().rev() {
            if !self.registry.needs_close(name) {
                continue;
            }
            match self.registry.close_plugin(name) {
                Ok(()) => self.log.debug(&format!("Plugin {} closed", name)),
                Err(e) => {
                    self.log.error(&e.to_string());
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}
