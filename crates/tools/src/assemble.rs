//! Turns settings into an indexing configuration
//!
//! Runs once at startup: every artifact and ABI is read, every address and
//! start block resolved, and the first failure aborts the whole assembly.

use std::path::Path;

use indexer_core::{
    ContractDeployment, Error, IndexingConfigBuilder, IndexingConfiguration, Result, StartBlockPolicy,
};
use indexer_ethereum::{parse_address, ContractAbi, DeploymentArtifact};
use tracing::{info, warn};

use crate::config::{ConfigValidator, DeploymentSettings, IndexerSettings};

/// Build the indexing configuration described by `settings`
///
/// Relative artifact and ABI paths are resolved against `base_dir`.
pub fn assemble(settings: &IndexerSettings, base_dir: &Path) -> Result<IndexingConfiguration> {
    if let Err(errors) = settings.validate() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(Error::configuration(messages.join("; ")));
    }

    let mut builder = IndexingConfigBuilder::new();

    for (name, network) in &settings.networks {
        builder = builder.network(name.clone(), network.to_network_config());
    }

    for (name, contract) in &settings.contracts {
        let abi = ContractAbi::load(base_dir.join(&contract.abi))?;
        builder = builder.contract(name.clone(), Some(abi.into_value()));

        for (network, deployment) in &contract.network {
            let resolved = resolve_deployment(name, network, deployment, base_dir)?;
            builder = builder.deployment(name.clone(), network.clone(), resolved);
        }
    }

    builder.build()
}

fn resolve_deployment(
    contract: &str,
    network: &str,
    deployment: &DeploymentSettings,
    base_dir: &Path,
) -> Result<ContractDeployment> {
    let (address, computed) = match (&deployment.artifact, &deployment.address) {
        (Some(artifact), None) => {
            let resolved = DeploymentArtifact::load(base_dir.join(artifact))?.resolve()?;
            (resolved.address, Some(resolved.start_height))
        }
        (None, Some(raw)) => (parse_address(raw)?, None),
        _ => {
            return Err(Error::configuration(format!(
                "contract '{}' on '{}' must set exactly one of 'artifact' or 'address'",
                contract, network
            )))
        }
    };

    if let (StartBlockPolicy::Pinned(pinned), Some(height)) = (deployment.start_block, computed) {
        if pinned != height {
            warn!(
                contract,
                network,
                pinned,
                computed = height,
                "Pinned start block overrides the deployment height"
            );
        }
    }

    let start_block = deployment.start_block.apply(computed)?;

    info!(
        contract,
        network,
        address = %address.to_checksum(None),
        start_block,
        "Resolved contract deployment"
    );

    Ok(ContractDeployment { address, start_block })
}
