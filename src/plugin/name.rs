//! Plugin identity.

use crate::config::CONFIG_SUFFIX;
use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Short, immutable plugin name.
///
/// Used to tag log output and to derive resource names such as the config
/// file name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginName(String);

impl PluginName {
    /// Validate and create a plugin name.
    pub fn new(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && !name
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || c == '/' || c == '\\');
        if !valid {
            return Err(Error::InvalidPluginName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Config file name: `<name>.conf`.
    pub fn config_file_name(&self) -> String {
        format!("{}{}", self.0, CONFIG_SUFFIX)
    }

    /// Prefix for environment variables, e.g. `kv-store` -> `KV_STORE`.
    pub fn env_prefix(&self) -> String {
        self.0
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl std::fmt::Display for PluginName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PluginName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PluginName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<PluginName> for String {
    fn from(name: PluginName) -> Self {
        name.0
    }
}

impl std::str::FromStr for PluginName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
