//! Hello world agent.
//!
//! Runs a single plugin that reads its greeting from `helloworld.conf`
//! (looked up in `CONFIG_DIR`, or overridden with `HELLOWORLD_CONFIG`) and
//! logs through its injected logger until interrupted.

use plugkit::agent::Agent;
use plugkit::config::ConfigSource;
use plugkit::logging::registry::LOGS_CONFIG_NAME;
use plugkit::logging::{init_tracing, LoggerRegistry};
use plugkit::plugin::{Plugin, PluginDeps, PluginName, PluginResult};
use serde::Deserialize;
use tracing::info;

/// Contents of `helloworld.conf`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Config {
    greeting: String,
    #[serde(default)]
    farewell: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            greeting: "Hello World!".to_string(),
            farewell: None,
        }
    }
}

struct HelloWorld {
    deps: PluginDeps,
    config: Config,
}

impl HelloWorld {
    fn new() -> plugkit::Result<Self> {
        Ok(Self {
            deps: PluginDeps::new("helloworld")?,
            config: Config::default(),
        })
    }
}

impl Plugin for HelloWorld {
    fn name(&self) -> &PluginName {
        self.deps.plugin_name()
    }

    fn init(&mut self) -> PluginResult<()> {
        let found = self.deps.cfg.load_into(&mut self.config)?;
        if !found {
            self.deps.log.warn(&format!(
                "Config {} not found, using defaults",
                self.deps.cfg.config_path().display()
            ));
        }

        self.deps.log.info(&format!("Greeting: {}", self.config.greeting));
        Ok(())
    }

    fn close(&mut self) -> PluginResult<()> {
        match &self.config.farewell {
            Some(farewell) => self.deps.log.info(farewell),
            None => self.deps.log.error("No farewell configured"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> plugkit::Result<()> {
    init_tracing("info");

    let logs = PluginDeps::builder(LOGS_CONFIG_NAME)
        .config_source(ConfigSource::from_env())
        .build()?;
    if LoggerRegistry::global().load_config(logs.cfg())? {
        info!("Applied {}", logs.cfg().config_path().display());
    }

    let mut agent = Agent::new().with_plugin(Box::new(HelloWorld::new()?))?;
    info!("Press Ctrl+C to stop");
    agent.run().await
}
