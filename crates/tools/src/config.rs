/// Settings management for the indexer configuration layer
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexer_core::{IndexingConfiguration, NetworkConfig, StartBlockPolicy};
use serde::{Deserialize, Serialize};

/// Connection settings for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Chain identifier
    pub chain_id: u64,

    /// RPC transport endpoint
    pub rpc_url: String,

    /// Disable the runtime's RPC response cache
    #[serde(default)]
    pub disable_cache: bool,
}

impl NetworkSettings {
    pub fn to_network_config(&self) -> NetworkConfig {
        NetworkConfig {
            chain_id: self.chain_id,
            rpc_url: self.rpc_url.clone(),
            disable_cache: self.disable_cache,
        }
    }
}

/// Where a contract's address and start block come from on one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// Broadcast record of the deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,

    /// Literal address, for contracts deployed outside our scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Start block policy
    #[serde(default)]
    pub start_block: StartBlockPolicy,
}

/// Settings for one logical contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSettings {
    /// ABI JSON file
    pub abi: PathBuf,

    /// Deployments keyed by network name
    pub network: BTreeMap<String, DeploymentSettings>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Main settings structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerSettings {
    /// Network configurations
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkSettings>,

    /// Contract configurations
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractSettings>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

impl IndexerSettings {
    /// Reference layout: the v4 pool manager and the async swap hook on Unichain
    pub fn unichain_reference() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            "unichain".to_string(),
            NetworkSettings {
                chain_id: 130,
                rpc_url: "http://127.0.0.1:8545".to_string(),
                disable_cache: true,
            },
        );

        let mut contracts = BTreeMap::new();
        contracts.insert(
            "PoolManager".to_string(),
            ContractSettings {
                abi: PathBuf::from("abis/PoolManager.json"),
                network: BTreeMap::from([(
                    "unichain".to_string(),
                    DeploymentSettings {
                        artifact: None,
                        address: Some("0x1F98400000000000000000000000000000000004".to_string()),
                        start_block: StartBlockPolicy::Pinned(28_799_000),
                    },
                )]),
            },
        );
        contracts.insert(
            "CsmmHook".to_string(),
            ContractSettings {
                abi: PathBuf::from("abis/AsyncSwap.json"),
                network: BTreeMap::from([(
                    "unichain".to_string(),
                    DeploymentSettings {
                        artifact: Some(PathBuf::from("broadcast/01_DeployHook.s.sol/130/run-latest.json")),
                        address: None,
                        start_block: StartBlockPolicy::Pinned(28_799_000),
                    },
                )]),
            },
        );

        Self {
            networks,
            contracts,
            logging: LogConfig::default(),
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error in field '{}': {}", self.field, self.message)
    }
}

/// Configuration validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Configuration validator trait
pub trait ConfigValidator {
    /// Validate the configuration
    fn validate(&self) -> ValidationResult;
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl ConfigValidator for IndexerSettings {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        for (name, network) in &self.networks {
            if let Err(mut network_errors) = network.validate() {
                for error in &mut network_errors {
                    error.field = format!("networks.{}.{}", name, error.field);
                }
                errors.append(&mut network_errors);
            }
        }

        for (name, contract) in &self.contracts {
            let prefix = format!("contracts.{}", name);

            if contract.abi.as_os_str().is_empty() {
                errors.push(ValidationError::new(format!("{}.abi", prefix), "ABI path cannot be empty"));
            }

            if contract.network.is_empty() {
                errors.push(ValidationError::new(
                    format!("{}.network", prefix),
                    "Contract must be deployed on at least one network",
                ));
            }

            for (network, deployment) in &contract.network {
                let field = format!("{}.network.{}", prefix, network);

                if !self.networks.contains_key(network) {
                    errors.push(ValidationError::new(
                        field.clone(),
                        format!("Unknown network '{}'", network),
                    ));
                }

                if let Err(mut deployment_errors) = deployment.validate() {
                    for error in &mut deployment_errors {
                        error.field = format!("{}.{}", field, error.field);
                    }
                    errors.append(&mut deployment_errors);
                }
            }
        }

        if let Err(mut log_errors) = self.logging.validate() {
            errors.append(&mut log_errors);
        }

        into_result(errors)
    }
}

impl ConfigValidator for NetworkSettings {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.chain_id == 0 {
            errors.push(ValidationError::new("chain_id", "Chain ID must be greater than 0"));
        }

        if self.rpc_url.is_empty() {
            errors.push(ValidationError::new("rpc_url", "RPC URL cannot be empty"));
        } else if !["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|scheme| self.rpc_url.starts_with(scheme))
        {
            errors.push(ValidationError::new(
                "rpc_url",
                "RPC URL must start with http://, https://, ws:// or wss://",
            ));
        }

        into_result(errors)
    }
}

impl ConfigValidator for DeploymentSettings {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        match (&self.artifact, &self.address) {
            (Some(_), Some(_)) => errors.push(ValidationError::new(
                "address",
                "Set either 'artifact' or 'address', not both",
            )),
            (None, None) => errors.push(ValidationError::new(
                "artifact",
                "One of 'artifact' or 'address' is required",
            )),
            (None, Some(_)) if self.start_block == StartBlockPolicy::Computed => {
                errors.push(ValidationError::new(
                    "start_block",
                    "A computed start block requires a deployment artifact; pin the start block instead",
                ))
            }
            _ => {}
        }

        into_result(errors)
    }
}

impl ConfigValidator for LogConfig {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            errors.push(ValidationError::new(
                "logging.level",
                format!("Invalid log level '{}'. Valid levels: {}", self.level, valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty", "compact"];
        if !valid_formats.contains(&self.format.as_str()) {
            errors.push(ValidationError::new(
                "logging.format",
                format!("Invalid log format '{}'. Valid formats: {}", self.format, valid_formats.join(", ")),
            ));
        }

        into_result(errors)
    }
}

/// Environment variable carrying the RPC URL override for a network
pub fn rpc_url_env_var(network: &str) -> String {
    format!("INDEXER_{}_RPC_URL", network.to_uppercase().replace('-', "_"))
}

/// Settings manager for loading, validating and saving settings files
pub struct ConfigManager {
    settings: IndexerSettings,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager holding empty settings
    pub fn new() -> Self {
        Self {
            settings: IndexerSettings::default(),
            config_path: PathBuf::from("indexer.toml"),
        }
    }

    /// Wrap already loaded settings
    pub fn from_settings<P: AsRef<Path>>(settings: IndexerSettings, config_path: P) -> Self {
        Self {
            settings,
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Load settings from a file and apply environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let settings = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML configuration file: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON configuration file: {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML configuration file: {}", path.display()))?,
            _ => return Err(anyhow::anyhow!("Unsupported configuration file format. Supported formats: .toml, .json, .yaml, .yml")),
        };

        let mut manager = Self {
            settings,
            config_path: path.to_path_buf(),
        };

        manager.apply_environment_overrides();

        Ok(manager)
    }

    /// Apply environment variable overrides
    pub fn apply_environment_overrides(&mut self) {
        self.apply_overrides_with(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, network) in self.settings.networks.iter_mut() {
            if let Some(rpc_url) = lookup(&rpc_url_env_var(name)) {
                tracing::debug!(network = %name, "RPC URL overridden from environment");
                network.rpc_url = rpc_url;
            }
        }

        if let Some(level) = lookup("INDEXER_LOG_LEVEL") {
            self.settings.logging.level = level;
        }
        if let Some(format) = lookup("INDEXER_LOG_FORMAT") {
            self.settings.logging.format = format;
        }
    }

    /// Validate the current settings
    pub fn validate(&self) -> ValidationResult {
        self.settings.validate()
    }

    /// Get the settings
    pub fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    /// Get a mutable reference to the settings
    pub fn settings_mut(&mut self) -> &mut IndexerSettings {
        &mut self.settings
    }

    /// Directory relative paths in the settings are resolved against
    pub fn base_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolve artifacts and ABIs and build the indexing configuration
    pub fn assemble(&self) -> indexer_core::Result<IndexingConfiguration> {
        crate::assemble::assemble(&self.settings, self.base_dir())
    }

    /// Save the current settings to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&self.settings)
                .with_context(|| "Failed to serialize configuration to TOML")?,
            Some("json") => serde_json::to_string_pretty(&self.settings)
                .with_context(|| "Failed to serialize configuration to JSON")?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(&self.settings)
                .with_context(|| "Failed to serialize configuration to YAML")?,
            _ => return Err(anyhow::anyhow!("Unsupported configuration file format. Supported formats: .toml, .json, .yaml, .yml")),
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate a settings file with the reference layout
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let manager = Self::from_settings(IndexerSettings::unichain_reference(), &path);
        manager.save_to_file(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
