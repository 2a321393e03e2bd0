use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::types::{ChainFamily, DataType};

/// Environment variable holding the Dune API key
pub const API_KEY_VAR: &str = "DUNE_ECHO_API";
/// Environment variable overriding the API base URL
pub const BASE_URL_VAR: &str = "DUNE_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.dune.com/api";

/// Process configuration, built once at startup
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// A supported chain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChainInfo {
    pub name: String,
    #[serde(rename = "chainId", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

/// Supported chains per family
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainRegistry {
    pub evm: Vec<ChainInfo>,
    pub svm: Vec<ChainInfo>,
}

impl ChainRegistry {
    /// Load the registry from the embedded chain table
    pub fn load() -> Result<Self, ConfigError> {
        let registry_str = include_str!("../chains.json");
        let registry: ChainRegistry = serde_json::from_str(registry_str)?;
        Ok(registry)
    }

    pub fn chains(&self, family: ChainFamily) -> &[ChainInfo] {
        match family {
            ChainFamily::Evm => &self.evm,
            ChainFamily::Svm => &self.svm,
        }
    }

    /// Get a specific chain of a family
    pub fn get_chain(&self, name: &str, family: ChainFamily) -> Option<&ChainInfo> {
        self.chains(family).iter().find(|chain| chain.name == name)
    }

    pub fn chain_names(&self, family: ChainFamily) -> Vec<&str> {
        self.chains(family)
            .iter()
            .map(|chain| chain.name.as_str())
            .collect()
    }

    /// Whether `chain` may be queried with `data_type`. No chain means no constraint.
    pub fn validate(&self, chain: Option<&str>, data_type: DataType) -> bool {
        match chain.filter(|name| !name.is_empty()) {
            None => true,
            Some(name) => self.get_chain(name, data_type.family()).is_some(),
        }
    }
}
