use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{
    DEFAULT_SENTINEL_LABEL, FIELD_CATEGORY, FIELD_FLAVOR, FIELD_NAME, FIELD_PRICE,
};
use crate::parsers::DelimiterSetting;
use crate::query::FilterPolicy;

pub const DEFAULT_SOURCE: &str = "data/menulovis.csv";
pub const DEFAULT_CONFIG_NAME: &str = "menu";
pub const ENV_PREFIX: &str = "MENU";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Menu file path or http(s) URL loaded at startup.
    pub source: String,
    pub delimiter: DelimiterSetting,
    pub semicolon_marker: String,
    pub include_all_sentinel: bool,
    pub sentinel_label: String,
    pub required_fields: Vec<String>,
    pub numeric_fields: Vec<String>,
    pub filter_policy: FilterPolicy,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            delimiter: DelimiterSetting::Auto,
            semicolon_marker: "lovis".to_string(),
            include_all_sentinel: true,
            sentinel_label: DEFAULT_SENTINEL_LABEL.to_string(),
            required_fields: vec![
                FIELD_NAME.to_string(),
                FIELD_CATEGORY.to_string(),
                FIELD_FLAVOR.to_string(),
            ],
            numeric_fields: vec![FIELD_PRICE.to_string()],
            filter_policy: FilterPolicy::Wildcard,
            user_agent: concat!("menu-recommender/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_seconds: 25,
            max_retries: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

/// Values given on the command line; they beat files and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub source: Option<String>,
    pub delimiter: Option<DelimiterSetting>,
    pub filter_policy: Option<FilterPolicy>,
}

impl Config {
    /// Defaults, then `menu.toml` (or the given file), then `MENU_*`
    /// environment variables, then command line overrides.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let defaults = Config::default();

        let mut builder = config::Config::builder()
            .set_default("source", defaults.source)?
            .set_default("delimiter", "auto")?
            .set_default("semicolon_marker", defaults.semicolon_marker)?
            .set_default("include_all_sentinel", defaults.include_all_sentinel)?
            .set_default("sentinel_label", defaults.sentinel_label)?
            .set_default("required_fields", defaults.required_fields)?
            .set_default("numeric_fields", defaults.numeric_fields)?
            .set_default("filter_policy", "wildcard")?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("request_timeout_seconds", defaults.request_timeout_seconds as i64)?
            .set_default("max_retries", defaults.max_retries as i64)?
            .set_default("retry_base_delay_ms", defaults.retry_base_delay_ms as i64)?;

        builder = match &overrides.config_file {
            Some(path) => builder.add_source(config::File::from(path.as_path()).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        if let Some(source) = &overrides.source {
            builder = builder.set_override("source", source.as_str())?;
        }
        if let Some(delimiter) = overrides.delimiter {
            builder = builder.set_override("delimiter", setting_name(&delimiter)?)?;
        }
        if let Some(policy) = overrides.filter_policy {
            builder = builder.set_override("filter_policy", setting_name(&policy)?)?;
        }

        let config: Config = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            anyhow::bail!("source must not be empty");
        }
        if self.include_all_sentinel && self.sentinel_label.trim().is_empty() {
            anyhow::bail!("sentinel_label must not be empty when include_all_sentinel is set");
        }
        if self.max_retries == 0 {
            anyhow::bail!("max_retries must be at least 1");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

// Serialized form of a unit enum, i.e. the string the config file would hold
fn setting_name<T: Serialize>(value: &T) -> Result<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(name) => Ok(name),
        other => anyhow::bail!("unexpected setting value {}", other),
    }
}
