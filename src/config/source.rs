//! Config file location.
//!
//! A plugin's config file is `<name>.conf`, looked up in the config directory
//! unless an explicit path overrides it.

use crate::plugin::PluginName;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "CONFIG_DIR";

/// Suffix appended to a plugin name to form its config file name.
pub const CONFIG_SUFFIX: &str = ".conf";

/// Where plugin config files are looked up.
#[derive(Clone, Debug, Default)]
pub struct ConfigSource {
    /// Directory holding `<name>.conf` files
    dir: Option<PathBuf>,
    /// Explicit per-plugin paths
    overrides: HashMap<String, PathBuf>,
    /// Consult `<PREFIX>_CONFIG` variables during resolution
    use_env: bool,
}

impl ConfigSource {
    /// Source resolving relative to the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source configured from the environment.
    ///
    /// `CONFIG_DIR` sets the directory; `<PREFIX>_CONFIG` (see
    /// [`PluginName::env_prefix`]) overrides the path of a single plugin.
    pub fn from_env() -> Self {
        Self {
            dir: std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from),
            overrides: HashMap::new(),
            use_env: true,
        }
    }

    /// Set the config directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Override the config path of one plugin.
    pub fn with_override(mut self, plugin: &str, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(plugin.to_string(), path.into());
        self
    }

    /// Configured directory, if any.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolve the config file path for a plugin.
    pub fn resolve(&self, name: &PluginName) -> PathBuf {
        self.resolve_with(name, |key| std::env::var_os(key).map(PathBuf::from))
    }

    fn resolve_with(
        &self,
        name: &PluginName,
        lookup: impl Fn(&str) -> Option<PathBuf>,
    ) -> PathBuf {
        if let Some(path) = self.overrides.get(name.as_str()) {
            return path.clone();
        }

        if self.use_env {
            let key = format!("{}_CONFIG", name.env_prefix());
            if let Some(path) = lookup(&key).filter(|p| !p.as_os_str().is_empty()) {
                return path;
            }
        }

        let file = name.config_file_name();
        match &self.dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}
