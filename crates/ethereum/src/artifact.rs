//! Deployment artifact resolution
//!
//! Reads the broadcast record a deployment script leaves behind and extracts
//! the deployed address and the block the deployment was mined in.

use std::path::Path;

use indexer_core::{Error, ResolvedContract, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::{decode_block_height, parse_address};

/// One transaction of a broadcast record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: Option<String>,
    pub transaction_type: Option<String>,
    pub contract_name: Option<String>,
    /// Only set on contract-creation transactions
    pub contract_address: Option<String>,
}

/// One mined receipt of a broadcast record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    pub transaction_hash: Option<String>,
    pub contract_address: Option<String>,
    /// Hex-encoded block number
    pub block_number: Option<String>,
}

/// Recorded result of a deployment run
///
/// `transactions[i]` and `receipts[i]` come from the same run and are
/// correlated by position. Resolution reads index 0 of both and does not
/// check that they belong together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentArtifact {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub receipts: Vec<ReceiptRecord>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl DeploymentArtifact {
    /// Parse a broadcast record from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::serialization(format!("invalid deployment artifact: {}", e)))
    }

    /// Read a broadcast record from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read deployment artifact {}: {}", path.display(), e)))?;

        serde_json::from_str(&content).map_err(|e| {
            Error::serialization(format!("invalid deployment artifact {}: {}", path.display(), e))
        })
    }

    /// Extract the deployed address and start height
    ///
    /// Missing fields are an error; no default address or height is ever
    /// substituted.
    pub fn resolve(&self) -> Result<ResolvedContract> {
        let transaction = self
            .transactions
            .first()
            .ok_or_else(|| Error::missing_deployment_data("transactions[0]"))?;
        let raw_address = non_empty(&transaction.contract_address)
            .ok_or_else(|| Error::missing_deployment_data("transactions[0].contractAddress"))?;

        let receipt = self
            .receipts
            .first()
            .ok_or_else(|| Error::missing_deployment_data("receipts[0]"))?;
        let raw_height = non_empty(&receipt.block_number)
            .ok_or_else(|| Error::missing_deployment_data("receipts[0].blockNumber"))?;

        let address = parse_address(raw_address)?;
        let start_height = decode_block_height(raw_height)?;

        let resolved = ResolvedContract::new(address, start_height);
        debug!(
            address = %resolved.checksummed_address(),
            start_height,
            contract = transaction.contract_name.as_deref().unwrap_or("<unnamed>"),
            "Resolved deployment artifact"
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOOK_ARTIFACT: &str = r#"{
        "transactions": [
            {
                "hash": "0x8e0cbb5d0b5b6e0c1d0e1a3b8b61f0b0c7c1a3d8e0f4d1c2b3a4958677a6b5c4",
                "transactionType": "CREATE2",
                "contractName": "AsyncSwap",
                "contractAddress": "0x1f98400000000000000000000000000000000004",
                "function": null,
                "arguments": ["0x1F98400000000000000000000000000000000004"]
            },
            {
                "hash": "0x11",
                "transactionType": "CALL",
                "contractName": null,
                "contractAddress": null
            }
        ],
        "receipts": [
            {
                "status": "0x1",
                "transactionHash": "0x8e0cbb5d0b5b6e0c1d0e1a3b8b61f0b0c7c1a3d8e0f4d1c2b3a4958677a6b5c4",
                "blockNumber": "0x1a8d965",
                "contractAddress": null
            }
        ],
        "libraries": [],
        "pending": [],
        "chain": 130
    }"#;

    #[test]
    fn test_resolve_broadcast_record() {
        let artifact = DeploymentArtifact::from_json(HOOK_ARTIFACT).unwrap();
        let resolved = artifact.resolve().unwrap();

        assert_eq!(resolved.checksummed_address(), "0x1F98400000000000000000000000000000000004");
        assert_eq!(resolved.start_height, 27_859_493);
    }

    #[test]
    fn test_resolve_minimal_record() {
        let artifact = DeploymentArtifact::from_json(
            r#"{"transactions":[{"contractAddress":"0x1f98400000000000000000000000000000000004"}],
                "receipts":[{"blockNumber":"0x1a8d965"}]}"#,
        )
        .unwrap();

        let resolved = artifact.resolve().unwrap();
        assert_eq!(resolved.checksummed_address(), "0x1F98400000000000000000000000000000000004");
        assert_eq!(resolved.start_height, 27_859_493);
    }

    #[test]
    fn test_empty_transactions_is_missing_data() {
        let artifact = DeploymentArtifact::from_json(r#"{"transactions":[],"receipts":[{"blockNumber":"0x1"}]}"#).unwrap();
        let err = artifact.resolve().unwrap_err();

        assert_eq!(err.kind(), "MissingDeploymentData");
        assert!(err.to_string().contains("transactions[0]"));
    }

    #[test]
    fn test_absent_arrays_are_missing_data() {
        let artifact = DeploymentArtifact::from_json("{}").unwrap();
        assert_eq!(artifact.resolve().unwrap_err().kind(), "MissingDeploymentData");
    }

    #[test]
    fn test_missing_contract_address() {
        for tx in [r#"{}"#, r#"{"contractAddress":null}"#, r#"{"contractAddress":""}"#] {
            let json = format!(r#"{{"transactions":[{}],"receipts":[{{"blockNumber":"0x1"}}]}}"#, tx);
            let err = DeploymentArtifact::from_json(&json).unwrap().resolve().unwrap_err();
            assert!(
                matches!(&err, Error::MissingDeploymentData { field } if field == "transactions[0].contractAddress"),
                "unexpected error for {}: {:?}",
                tx,
                err
            );
        }
    }

    #[test]
    fn test_missing_receipt_or_block_number() {
        let no_receipts = DeploymentArtifact {
            transactions: vec![TransactionRecord {
                contract_address: Some("0x1f98400000000000000000000000000000000004".to_string()),
                ..Default::default()
            }],
            receipts: vec![],
        };
        let err = no_receipts.resolve().unwrap_err();
        assert!(matches!(&err, Error::MissingDeploymentData { field } if field == "receipts[0]"));

        let no_block = DeploymentArtifact {
            receipts: vec![ReceiptRecord::default()],
            ..no_receipts
        };
        let err = no_block.resolve().unwrap_err();
        assert!(matches!(&err, Error::MissingDeploymentData { field } if field == "receipts[0].blockNumber"));
    }

    #[test]
    fn test_invalid_address_and_height() {
        let bad_address = DeploymentArtifact::from_json(
            r#"{"transactions":[{"contractAddress":"0x1234"}],"receipts":[{"blockNumber":"0x1"}]}"#,
        )
        .unwrap();
        assert_eq!(bad_address.resolve().unwrap_err().kind(), "InvalidAddress");

        let bad_height = DeploymentArtifact::from_json(
            r#"{"transactions":[{"contractAddress":"0x1f98400000000000000000000000000000000004"}],
                "receipts":[{"blockNumber":"0xnope"}]}"#,
        )
        .unwrap();
        assert_eq!(bad_height.resolve().unwrap_err().kind(), "MalformedHeight");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run-latest.json");
        std::fs::write(&path, HOOK_ARTIFACT).unwrap();

        let resolved = DeploymentArtifact::load(&path).unwrap().resolve().unwrap();
        assert_eq!(resolved.start_height, 27_859_493);

        let err = DeploymentArtifact::load(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.kind(), "Io");
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = DeploymentArtifact::from_json("{\"transactions\": 5}").unwrap_err();
        assert_eq!(err.kind(), "Serialization");
    }
}
