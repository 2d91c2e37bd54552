//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: `Default` implementations and serde defaults
//! 2. **Config file**: YAML file passed on the command line
//! 3. **Environment variables**: `NODECHECK__*` env vars override specific fields
//!
//! Command-line flags are applied by the binary on top of the loaded values.
//!
//! # Example
//!
//! ```yaml
//! upstream-config:
//!   upstreams:
//!     - id: eth-node-1
//!       chain: ethereum
//!       connectors:
//!         - type: json-rpc
//!           url: https://rpc.example.com
//! checks:
//!   max_block_gap: 10
//! logging:
//!   format: json
//! ```

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};
use thiserror::Error;

use crate::{
    checker::CheckOptions,
    types::{NodeDescriptor, NodesByChain},
};

/// Connector type probed by the checker. Other connector types are ignored.
pub const JSON_RPC_CONNECTOR: &str = "json-rpc";

/// Prefix for environment overrides, e.g. `NODECHECK__CHECKS__MAX_BLOCK_GAP=20`.
pub const ENV_PREFIX: &str = "NODECHECK";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Source(#[from] config::ConfigError),

    #[error("no upstreams configured in config file")]
    NoUpstreams,

    #[error("upstream {upstream} has empty connector URL")]
    EmptyUrl { upstream: String },

    #[error("duplicate connector URL: {0}")]
    DuplicateUrl(String),

    #[error("logging format must be 'json' or 'pretty', got '{0}'")]
    InvalidLogFormat(String),
}

/// One endpoint of an upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// A named node serving one chain, reachable through one or more connectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub id: String,
    pub chain: String,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub upstreams: Vec<Upstream>,
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "upstream-config", default)]
    pub upstream_config: UpstreamConfig,

    #[serde(default)]
    pub checks: CheckOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads and validates a YAML file with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if it
    /// fails [`validate`](Self::validate).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load(File::from(path.as_ref()).format(FileFormat::Yaml).required(true))
    }

    /// Loads and validates configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text cannot be parsed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::load(File::from_str(content, FileFormat::Yaml))
    }

    fn load<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = Config::builder()
            .add_source(source)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks that:
    /// - At least one upstream is configured
    /// - No connector URL is empty
    /// - No connector URL appears twice, across all upstreams
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let upstreams = &self.upstream_config.upstreams;
        if upstreams.is_empty() {
            return Err(ConfigError::NoUpstreams);
        }

        let mut seen = HashSet::new();
        for upstream in upstreams {
            for connector in &upstream.connectors {
                if connector.url.is_empty() {
                    return Err(ConfigError::EmptyUrl { upstream: upstream.id.clone() });
                }
                if !seen.insert(connector.url.as_str()) {
                    return Err(ConfigError::DuplicateUrl(connector.url.clone()));
                }
            }
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(self.logging.format.clone()));
        }

        Ok(())
    }

    /// Every JSON-RPC connector as a node, in file order.
    #[must_use]
    pub fn all_nodes(&self) -> Vec<NodeDescriptor> {
        self.upstream_config
            .upstreams
            .iter()
            .flat_map(|upstream| {
                upstream
                    .connectors
                    .iter()
                    .filter(|c| c.kind == JSON_RPC_CONNECTOR)
                    .map(|c| NodeDescriptor::new(&upstream.id, &upstream.chain, &c.url))
            })
            .collect()
    }

    /// JSON-RPC nodes grouped by chain, keeping file order within each chain.
    ///
    /// Chains whose upstreams expose no JSON-RPC connector do not appear.
    #[must_use]
    pub fn nodes_by_chain(&self) -> NodesByChain {
        let mut chains = NodesByChain::new();
        for node in self.all_nodes() {
            chains.entry(node.chain.clone()).or_default().push(node);
        }
        chains
    }
}
