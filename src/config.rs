use crate::store::RelayerSettings;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use rust_decimal::Decimal;
use serde::Deserialize;

const ENV_PREFIX: &str = "PLANNER";
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Relayer fee charged on top of each order, in percent.
    #[serde(default)]
    pub fee_percentage: Decimal,
    #[serde(default = "default_fee_recipient")]
    pub fee_recipient: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:9999".to_string()
}

fn default_fee_recipient() -> String {
    ZERO_ADDRESS.to_string()
}

impl Settings {
    /// Optional `config.toml` in the working directory, overridden by
    /// `PLANNER_*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_path(None)
    }

    pub fn load_with_path(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::with_name(path).required(true)),
            None => Config::builder().add_source(File::with_name("config").required(false)),
        };
        Self::from_builder(builder.add_source(Environment::with_prefix(ENV_PREFIX)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn relayer_settings(&self) -> RelayerSettings {
        RelayerSettings {
            fee_percentage: self.fee_percentage,
            fee_recipient: self.fee_recipient.clone(),
        }
    }
}
