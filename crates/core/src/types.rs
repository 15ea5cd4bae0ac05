use alloy_primitives::Address;
use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result};

/// A contract address and the block its deployment was mined in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedContract {
    /// Deployed contract address
    pub address: Address,

    /// Block number of the deployment receipt
    pub start_height: u64,
}

impl ResolvedContract {
    pub fn new(address: Address, start_height: u64) -> Self {
        Self { address, start_height }
    }

    /// EIP-55 checksummed form of the address
    pub fn checksummed_address(&self) -> String {
        self.address.to_checksum(None)
    }
}

/// How the start block of a contract deployment is chosen
///
/// A pinned height always wins over the height read from the deployment
/// artifact. Whether a pin is there to skip a backfill range or is stale is
/// not something this layer can tell, so callers log the discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartBlockPolicy {
    /// Start at the block the deployment transaction was mined in
    #[default]
    Computed,

    /// Start at a fixed block regardless of the deployment record
    Pinned(u64),
}

impl StartBlockPolicy {
    /// Pick the start block given the height computed from an artifact, if any
    pub fn apply(&self, computed: Option<u64>) -> Result<u64> {
        match (self, computed) {
            (StartBlockPolicy::Pinned(pinned), _) => Ok(*pinned),
            (StartBlockPolicy::Computed, Some(height)) => Ok(height),
            (StartBlockPolicy::Computed, None) => Err(Error::configuration(
                "start block policy is 'computed' but no deployment artifact provides a height",
            )),
        }
    }
}

/// Serialize an address in its checksummed form
pub fn serialize_checksummed<S: Serializer>(address: &Address, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}
