//! Contract ABI documents
//!
//! ABIs are handed to the indexing runtime unchanged. The only structural
//! requirement is that the document is a JSON array; event summaries exist
//! for inspection and never feed back into the configuration.

use std::path::Path;

use indexer_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha3::{Digest, Keccak256};

/// An ABI document kept exactly as it was read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAbi {
    raw: Value,
}

/// Event entry of an ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiEvent {
    /// Event name
    pub name: String,
    /// Event inputs
    pub inputs: Vec<AbiParameter>,
    /// Whether event is anonymous
    pub anonymous: bool,
}

/// ABI parameter definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiParameter {
    pub name: String,
    /// Parameter type (e.g., uint256, address, tuple[])
    pub param_type: String,
    /// Components (for tuples and structs)
    pub components: Vec<AbiParameter>,
    /// Whether parameter is indexed
    pub indexed: bool,
}

impl ContractAbi {
    /// Wrap a JSON value, checking that it is an ABI array
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_array() {
            return Err(Error::configuration("ABI must be a JSON array"));
        }
        Ok(Self { raw: value })
    }

    /// Parse an ABI from JSON content
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Read an ABI file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read ABI file {}: {}", path.display(), e)))?;

        Self::from_json(&content).map_err(|e| match e {
            Error::Configuration(msg) => Error::configuration(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }

    /// Event entries of the ABI, in document order
    pub fn events(&self) -> Result<Vec<AbiEvent>> {
        let items = self.raw.as_array().map(Vec::as_slice).unwrap_or_default();

        items
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("event"))
            .map(parse_event)
            .collect()
    }
}

impl AbiEvent {
    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(canonical_type).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Topic-0 hash of the event
    pub fn topic(&self) -> String {
        let mut hasher = Keccak256::new();
        hasher.update(self.signature().as_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

fn parse_event(value: &Value) -> Result<AbiEvent> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::configuration("ABI event must have a name"))?
        .to_string();

    let inputs = value
        .get("inputs")
        .and_then(Value::as_array)
        .map(|arr| parse_parameters(arr))
        .transpose()?
        .unwrap_or_default();

    let anonymous = value.get("anonymous").and_then(Value::as_bool).unwrap_or(false);

    Ok(AbiEvent { name, inputs, anonymous })
}

fn parse_parameters(array: &[Value]) -> Result<Vec<AbiParameter>> {
    array
        .iter()
        .map(|param| -> Result<AbiParameter> {
            let name = param.get("name").and_then(Value::as_str).unwrap_or("").to_string();

            let param_type = param
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::configuration(format!("ABI parameter '{}' must have a type", name)))?
                .to_string();

            let components = if param_type.starts_with("tuple") {
                param
                    .get("components")
                    .and_then(Value::as_array)
                    .map(|arr| parse_parameters(arr))
                    .transpose()?
                    .unwrap_or_default()
            } else {
                Vec::new()
            };

            let indexed = param.get("indexed").and_then(Value::as_bool).unwrap_or(false);

            Ok(AbiParameter {
                name,
                param_type,
                components,
                indexed,
            })
        })
        .collect()
}

/// Tuples expand to their component list, array suffixes are kept
fn canonical_type(param: &AbiParameter) -> String {
    match param.param_type.strip_prefix("tuple") {
        Some(suffix) => {
            let inner: Vec<String> = param.components.iter().map(canonical_type).collect();
            format!("({}){}", inner.join(","), suffix)
        }
        None => param.param_type.clone(),
    }
}
