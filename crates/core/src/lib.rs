/// Indexer core types: resolved deployments, start-block policy and the indexing configuration
pub mod types;
pub mod config;
pub mod service;

/// Re-export common types from indexer-common
pub use indexer_common::{Error, Result};

pub use config::{ContractConfig, ContractDeployment, IndexingConfigBuilder, IndexingConfiguration, NetworkConfig};
pub use service::{IndexingRuntime, JsonExport};
pub use types::{ResolvedContract, StartBlockPolicy};
