//! Plugin dependencies.
//!
//! [`PluginDeps`] bundles the collaborators every plugin needs: its name, a
//! logger named after it and a loader for its config file. Plugins embed it as
//! a field and receive it at construction time.

use crate::config::{ConfigSource, PluginConfig};
use crate::core::Result;
use crate::logging::{Logger, LoggerRegistry};
use crate::plugin::name::PluginName;
use std::path::PathBuf;

/// Capabilities injected into a plugin.
#[derive(Clone, Debug)]
pub struct PluginDeps {
    /// Plugin identity
    pub name: PluginName,
    /// Logger named after the plugin
    pub log: Logger,
    /// Loader for `<name>.conf`
    pub cfg: PluginConfig,
}

impl PluginDeps {
    /// Set up dependencies from the global logger registry and the
    /// environment-driven config source.
    pub fn new(name: &str) -> Result<Self> {
        Self::builder(name).build()
    }

    /// Start building dependencies with explicit collaborators.
    pub fn builder(name: &str) -> PluginDepsBuilder {
        PluginDepsBuilder {
            name: name.to_string(),
            registry: None,
            source: None,
            path: None,
        }
    }

    /// Plugin name.
    pub fn plugin_name(&self) -> &PluginName {
        &self.name
    }

    /// Plugin logger.
    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// Plugin config loader.
    pub fn cfg(&self) -> &PluginConfig {
        &self.cfg
    }
}

/// Builder for [`PluginDeps`].
#[derive(Debug)]
pub struct PluginDepsBuilder {
    name: String,
    registry: Option<LoggerRegistry>,
    source: Option<ConfigSource>,
    path: Option<PathBuf>,
}

impl PluginDepsBuilder {
    /// Take the logger from this registry instead of the global one.
    pub fn registry(mut self, registry: LoggerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Resolve the config file through this source.
    pub fn config_source(mut self, source: ConfigSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Load the config from an explicit file.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Validate the name, then set up the logger and config loader.
    pub fn build(self) -> Result<PluginDeps> {
        let name = PluginName::new(&self.name)?;

        let log = match &self.registry {
            Some(registry) => registry.get_or_create(name.as_str()),
            None => LoggerRegistry::global().get_or_create(name.as_str()),
        };

        let cfg = match (self.path, self.source) {
            (Some(path), _) => PluginConfig::from_path(name.clone(), path),
            (None, Some(source)) => PluginConfig::new(name.clone(), &source),
            (None, None) => PluginConfig::new(name.clone(), &ConfigSource::from_env()),
        };

        log.debug(&format!("Config file: {}", cfg.config_path().display()));

        Ok(PluginDeps { name, log, cfg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::logging::LogLevel;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Config {
        greeting: String,
    }

    #[test]
    fn test_invalid_name_rejected_before_setup() {
        let registry = LoggerRegistry::default();
        let err = PluginDeps::builder("")
            .registry(registry.clone())
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPluginName(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_logger_and_config_follow_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = LoggerRegistry::default();
        let deps = PluginDeps::builder("helloworld")
            .registry(registry.clone())
            .config_source(ConfigSource::new().with_dir(dir.path()))
            .build()
            .unwrap();

        assert_eq!(deps.plugin_name().as_str(), "helloworld");
        assert_eq!(deps.log().name(), "helloworld");
        assert!(registry.get("helloworld").is_some());
        assert_eq!(deps.cfg().config_path(), dir.path().join("helloworld.conf"));
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "greeting: Howdy\n").unwrap();

        let deps = PluginDeps::builder("helloworld")
            .registry(LoggerRegistry::default())
            .config_path(&path)
            .build()
            .unwrap();

        let config: Config = deps.cfg().load_value().unwrap().unwrap();
        assert_eq!(config.greeting, "Howdy");
    }

    #[test]
    fn test_registry_controls_plugin_level() {
        let registry = LoggerRegistry::new(LogLevel::Warn);
        let deps = PluginDeps::builder("quiet")
            .registry(registry.clone())
            .build()
            .unwrap();

        deps.log().info("dropped");
        registry.set_level("quiet", LogLevel::Info).unwrap();
        deps.log().info("kept");

        let logs = deps.log().recent();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "kept");
    }

    #[test]
    fn test_new_uses_global_registry() {
        let deps = PluginDeps::new("global-deps-test").unwrap();
        assert!(LoggerRegistry::global().get("global-deps-test").is_some());
        assert!(deps
            .cfg()
            .config_path()
            .ends_with("global-deps-test.conf"));
    }
}
