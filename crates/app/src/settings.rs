//! Settings for the `ledger` binary.
//!
//! Sources, later ones winning: the TOML file (`ledger.toml` unless
//! `--config` says otherwise), then `LEDGER_`-prefixed environment variables
//! with `__` between sections (`LEDGER_CLIENT__ENDPOINT`), then command-line
//! flags.
use client::ClientConfig;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use relay::RelayConfig;
use serde::Deserialize;

const DEFAULT_PATH: &str = "ledger.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub client: ClientConfig,
    pub relay: Option<RelayConfig>,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_PATH)).required(path.is_some()))
            .add_source(
                Environment::with_prefix("LEDGER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
