//! Plugin configuration loader.
//!
//! Loads a plugin's YAML config file into a caller-defined type. A missing
//! file is not an error: the loader reports "not found" and the plugin keeps
//! its defaults.

use crate::config::source::ConfigSource;
use crate::core::{Error, Result};
use crate::plugin::PluginName;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Configuration loader bound to one plugin.
#[derive(Clone, Debug)]
pub struct PluginConfig {
    /// Owning plugin
    name: PluginName,
    /// Resolved config file path
    path: PathBuf,
}

impl PluginConfig {
    /// Create a loader resolving the path through `source`.
    pub fn new(name: PluginName, source: &ConfigSource) -> Self {
        let path = source.resolve(&name);
        Self { name, path }
    }

    /// Create a loader for an explicit file.
    pub fn from_path(name: PluginName, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
        }
    }

    /// Owning plugin name.
    pub fn plugin_name(&self) -> &PluginName {
        &self.name
    }

    /// Resolved config file path.
    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Load the config file.
    ///
    /// Returns `Ok(None)` only when the file does not exist, `Ok(Some(value))`
    /// when it parses into `T`, and `Error::ConfigParse` when it is not valid
    /// YAML or does not match the shape of `T`. An empty document is handed to
    /// `T` as null, so types with `#[serde(default)]` load their defaults.
    pub fn load_value<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match self.read_document()? {
            Some(document) => serde_yaml::from_value(document)
                .map(Some)
                .map_err(|e| self.parse_error(e)),
            None => Ok(None),
        }
    }

    /// Load the config file into `dest`, returning whether it was found.
    ///
    /// `dest` is left untouched when the file is absent, holds an empty
    /// document, or fails to parse.
    pub fn load_into<T: DeserializeOwned>(&self, dest: &mut T) -> Result<bool> {
        let document = match self.read_document()? {
            Some(document) => document,
            None => return Ok(false),
        };
        if document.is_null() {
            return Ok(true);
        }

        *dest = serde_yaml::from_value(document).map_err(|e| self.parse_error(e))?;
        Ok(true)
    }

    /// Load the config file, falling back to `T::default()` when absent.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> Result<T> {
        Ok(self.load_value()?.unwrap_or_default())
    }

    fn read_document(&self) -> Result<Option<serde_yaml::Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::ConfigRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_yaml::from_str(&content)
            .map(Some)
            .map_err(|e| self.parse_error(e))
    }

    fn parse_error(&self, source: serde_yaml::Error) -> Error {
        Error::ConfigParse {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    struct Greeter {
        greeting: String,
        #[serde(default)]
        repeat: u32,
    }

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(format!("{}.conf", name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn loader(dir: &Path, name: &str) -> PluginConfig {
        let source = ConfigSource::new().with_dir(dir);
        PluginConfig::new(PluginName::new(name).unwrap(), &source)
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = loader(dir.path(), "helloworld");

        let value: Option<Greeter> = cfg.load_value().unwrap();
        assert!(value.is_none());

        let mut dest = Greeter {
            greeting: "unchanged".to_string(),
            repeat: 1,
        };
        assert!(!cfg.load_into(&mut dest).unwrap());
        assert_eq!(dest.greeting, "unchanged");
    }

    #[test]
    fn test_well_formed_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "helloworld", "greeting: Hello\nrepeat: 3\n");
        let cfg = loader(dir.path(), "helloworld");

        let value: Option<Greeter> = cfg.load_value().unwrap();
        assert_eq!(
            value,
            Some(Greeter {
                greeting: "Hello".to_string(),
                repeat: 3,
            })
        );
    }

    #[test]
    fn test_load_into_populates_destination() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "helloworld", "greeting: Hi\n");
        let cfg = loader(dir.path(), "helloworld");

        let mut dest = Greeter::default();
        assert!(cfg.load_into(&mut dest).unwrap());
        assert_eq!(dest.greeting, "Hi");
        assert_eq!(dest.repeat, 0);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "helloworld", "greeting: [unterminated\n");
        let cfg = loader(dir.path(), "helloworld");

        let err = cfg.load_value::<Greeter>().unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "helloworld", "greeting: Hello\nrepeat: many\n");
        let cfg = loader(dir.path(), "helloworld");

        let mut dest = Greeter::default();
        let err = cfg.load_into(&mut dest).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert_eq!(dest, Greeter::default());
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Tuning {
        retries: u32,
    }

    #[test]
    fn test_empty_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "helloworld", "");
        let cfg = loader(dir.path(), "helloworld");

        let mut dest = Tuning { retries: 7 };
        assert!(cfg.load_into(&mut dest).unwrap());
        assert_eq!(dest.retries, 7);

        let value: Option<Tuning> = cfg.load_value().unwrap();
        assert_eq!(value, Some(Tuning::default()));
    }

    #[test]
    fn test_comment_only_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "helloworld", "# nothing configured yet\n");
        let cfg = loader(dir.path(), "helloworld");

        let mut dest = Greeter {
            greeting: "kept".to_string(),
            repeat: 2,
        };
        assert!(cfg.load_into(&mut dest).unwrap());
        assert_eq!(dest.greeting, "kept");

        let err = cfg.load_value::<Greeter>().unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = loader(dir.path(), "helloworld");

        let value: Greeter = cfg.load_or_default().unwrap();
        assert_eq!(value, Greeter::default());
    }

    #[test]
    fn test_directory_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let name = PluginName::new("helloworld").unwrap();
        let cfg = PluginConfig::from_path(name, dir.path());

        let err = cfg.load_value::<Greeter>().unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_config_path_uses_plugin_name() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = loader(dir.path(), "helloworld");
        assert_eq!(cfg.config_path(), dir.path().join("helloworld.conf"));
        assert_eq!(cfg.plugin_name().as_str(), "helloworld");
    }
}
