//! Indexing configuration handed to the indexing runtime

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::types::{serialize_checksummed, ResolvedContract};
use crate::{Error, Result};

#[cfg(test)]
mod tests;

/// Connection parameters for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    /// RPC transport endpoint
    #[serde(rename = "transport")]
    pub rpc_url: String,
    pub disable_cache: bool,
}

/// Where and from which block a contract is indexed on one network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDeployment {
    #[serde(serialize_with = "serialize_checksummed")]
    pub address: Address,
    pub start_block: u64,
}

impl From<ResolvedContract> for ContractDeployment {
    fn from(resolved: ResolvedContract) -> Self {
        Self {
            address: resolved.address,
            start_block: resolved.start_height,
        }
    }
}

/// A logical contract: its deployments per network and its ABI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractConfig {
    /// Deployments keyed by network name
    pub network: BTreeMap<String, ContractDeployment>,
    /// ABI document, passed through untouched
    pub abi: Value,
}

/// Static description of what the indexing runtime subscribes to
///
/// Built once at startup and never mutated afterwards. Maps are ordered so
/// identical inputs always produce identical values and serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexingConfiguration {
    networks: BTreeMap<String, NetworkConfig>,
    contracts: BTreeMap<String, ContractConfig>,
}

impl IndexingConfiguration {
    pub fn networks(&self) -> &BTreeMap<String, NetworkConfig> {
        &self.networks
    }

    pub fn contracts(&self) -> &BTreeMap<String, ContractConfig> {
        &self.contracts
    }

    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.get(name)
    }

    pub fn contract(&self, name: &str) -> Option<&ContractConfig> {
        self.contracts.get(name)
    }

    /// Render the configuration as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Default)]
struct PendingContract {
    abi: Option<Value>,
    deployments: BTreeMap<String, ContractDeployment>,
}

/// Collects networks, ABIs and resolved deployments into an [`IndexingConfiguration`]
///
/// The builder trusts its inputs beyond structural shape: it makes no network
/// calls and never looks inside an ABI.
#[derive(Debug, Clone, Default)]
pub struct IndexingConfigBuilder {
    networks: BTreeMap<String, NetworkConfig>,
    contracts: BTreeMap<String, PendingContract>,
}

impl IndexingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a network's connection parameters
    pub fn network(mut self, name: impl Into<String>, config: NetworkConfig) -> Self {
        self.networks.insert(name.into(), config);
        self
    }

    /// Declare a logical contract with its ABI
    pub fn contract(mut self, name: impl Into<String>, abi: Option<Value>) -> Self {
        self.contracts.entry(name.into()).or_default().abi = abi;
        self
    }

    /// Add a deployment of a contract on a network
    pub fn deployment(
        mut self,
        contract: impl Into<String>,
        network: impl Into<String>,
        deployment: impl Into<ContractDeployment>,
    ) -> Self {
        self.contracts
            .entry(contract.into())
            .or_default()
            .deployments
            .insert(network.into(), deployment.into());
        self
    }

    /// Assemble the configuration
    ///
    /// Fails if a deployment names a network that was never registered, if a
    /// contract has no ABI, or if a contract has no deployments at all.
    pub fn build(&self) -> Result<IndexingConfiguration> {
        let mut contracts = BTreeMap::new();

        for (name, pending) in &self.contracts {
            let abi = pending
                .abi
                .clone()
                .ok_or_else(|| Error::configuration(format!("contract '{}' has no ABI", name)))?;

            if pending.deployments.is_empty() {
                return Err(Error::configuration(format!(
                    "contract '{}' is not deployed on any network",
                    name
                )));
            }

            for network in pending.deployments.keys() {
                if !self.networks.contains_key(network) {
                    return Err(Error::configuration(format!(
                        "contract '{}' references unknown network '{}'",
                        name, network
                    )));
                }
            }

            contracts.insert(
                name.clone(),
                ContractConfig {
                    network: pending.deployments.clone(),
                    abi,
                },
            );
        }

        debug!(
            networks = self.networks.len(),
            contracts = contracts.len(),
            "Built indexing configuration"
        );

        Ok(IndexingConfiguration {
            networks: self.networks.clone(),
            contracts,
        })
    }
}
