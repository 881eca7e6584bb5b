//! `athena.toml`: logging, owner identity and engine parameters.
//!
//! Every key is optional. Monetary values are written as plain integers and
//! must fit in 64 bits in the file.

use athena_types::{Address, EngineParams};
use athena_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot render TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Identity that owns the engine.
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default)]
    pub params: ParamsConfig,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_owner() -> String {
    "0x0000000000000000000000000000000000000001".into()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            owner: default_owner(),
            params: ParamsConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn owner_address(&self) -> Result<Address, ConfigError> {
        let owner = Address::new(self.owner.as_str());
        if !owner.is_valid() {
            return Err(ConfigError::Invalid(format!("owner {:?} is not an address", self.owner)));
        }
        Ok(owner)
    }

    /// Engine parameters, validated.
    pub fn engine_params(&self) -> Result<EngineParams, ConfigError> {
        let params = self.params.to_engine_params();
        params.validate().map_err(ConfigError::Invalid)?;
        Ok(params)
    }
}

/// The `[params]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsConfig {
    pub min_oracle_members: u32,
    pub min_stake: u64,
    pub dispute_fee: u64,
    pub min_dispute_votes: u32,
    pub dispute_quorum_bps: u32,
    pub platform_fee_bps: u32,
    pub voting_period_secs: u64,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self::from(&EngineParams::default())
    }
}

impl From<&EngineParams> for ParamsConfig {
    fn from(p: &EngineParams) -> Self {
        Self {
            min_oracle_members: p.min_oracle_members,
            min_stake: u64::try_from(p.min_stake).unwrap_or(u64::MAX),
            dispute_fee: u64::try_from(p.dispute_fee).unwrap_or(u64::MAX),
            min_dispute_votes: p.min_dispute_votes,
            dispute_quorum_bps: p.dispute_quorum_bps,
            platform_fee_bps: p.platform_fee_bps,
            voting_period_secs: p.voting_period_secs,
        }
    }
}

impl ParamsConfig {
    pub fn to_engine_params(&self) -> EngineParams {
        EngineParams {
            min_oracle_members: self.min_oracle_members,
            min_stake: u128::from(self.min_stake),
            dispute_fee: u128::from(self.dispute_fee),
            min_dispute_votes: self.min_dispute_votes,
            dispute_quorum_bps: self.dispute_quorum_bps,
            platform_fee_bps: self.platform_fee_bps,
            voting_period_secs: self.voting_period_secs,
            ..EngineParams::default()
        }
    }
}
