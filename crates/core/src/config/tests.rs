use std::str::FromStr;

use alloy_primitives::Address;
use serde_json::json;

use super::*;

fn unichain() -> NetworkConfig {
    NetworkConfig {
        chain_id: 130,
        rpc_url: "http://127.0.0.1:8545".to_string(),
        disable_cache: true,
    }
}

fn pool_manager() -> ContractDeployment {
    ContractDeployment {
        address: Address::from_str("0x1F98400000000000000000000000000000000004").unwrap(),
        start_block: 28_799_000,
    }
}

fn hook() -> ResolvedContract {
    ResolvedContract::new(
        Address::from_str("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap(),
        27_859_493,
    )
}

fn reference_builder() -> IndexingConfigBuilder {
    IndexingConfigBuilder::new()
        .network("unichain", unichain())
        .contract("PoolManager", Some(json!([{"type": "event", "name": "Swap", "inputs": []}])))
        .deployment("PoolManager", "unichain", pool_manager())
        .contract("CsmmHook", Some(json!([{"type": "event", "name": "HookSwap", "inputs": []}])))
        .deployment("CsmmHook", "unichain", hook())
}

#[test]
fn test_build_reference_configuration() {
    let config = reference_builder().build().unwrap();

    assert_eq!(config.networks().len(), 1);
    assert_eq!(config.network("unichain"), Some(&unichain()));

    let hook_config = config.contract("CsmmHook").unwrap();
    let deployment = hook_config.network.get("unichain").unwrap();
    assert_eq!(deployment.start_block, 27_859_493);
    assert_eq!(hook_config.abi[0]["name"], "HookSwap");
}

#[test]
fn test_build_is_deterministic() {
    let builder = reference_builder();
    let first = builder.build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(first, second);

    let rebuilt = reference_builder().build().unwrap();
    assert_eq!(first, rebuilt);
    assert_eq!(first.to_json_pretty().unwrap(), rebuilt.to_json_pretty().unwrap());
}

#[test]
fn test_unknown_network_is_rejected() {
    let err = reference_builder()
        .deployment("CsmmHook", "base", hook())
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), "ConfigurationError");
    assert!(err.to_string().contains("'base'"));
}

#[test]
fn test_missing_abi_is_rejected() {
    let err = IndexingConfigBuilder::new()
        .network("unichain", unichain())
        .deployment("PoolManager", "unichain", pool_manager())
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), "ConfigurationError");
    assert!(err.to_string().contains("PoolManager"));
}

#[test]
fn test_contract_without_deployments_is_rejected() {
    let err = IndexingConfigBuilder::new()
        .network("unichain", unichain())
        .contract("PoolManager", Some(json!([])))
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), "ConfigurationError");
}

#[test]
fn test_serialized_shape() {
    let config = reference_builder().build().unwrap();
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["networks"]["unichain"]["chainId"], 130);
    assert_eq!(value["networks"]["unichain"]["transport"], "http://127.0.0.1:8545");
    assert_eq!(value["networks"]["unichain"]["disableCache"], true);

    let pool = &value["contracts"]["PoolManager"]["network"]["unichain"];
    assert_eq!(pool["address"], "0x1F98400000000000000000000000000000000004");
    assert_eq!(pool["startBlock"], 28_799_000);

    let hook = &value["contracts"]["CsmmHook"]["network"]["unichain"];
    assert_eq!(hook["address"], "0x5FbDB2315678afecb367f032d93F642f64180aa3");
}
