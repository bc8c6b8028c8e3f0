use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use squares_core::Payouts;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Defaults read from the `--config` file. Command line flags win over these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Price of one square, used for participant investment.
    pub price_per_square: u32,
    /// Payouts for pools whose settings carry none.
    pub payouts: Option<Payouts>,
    pub format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price_per_square: 50,
            payouts: None,
            format: Format::Text,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
