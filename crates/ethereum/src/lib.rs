/// Ethereum deployment artifacts, addresses and ABI documents
pub mod abi;
pub mod address;
pub mod artifact;

pub use abi::{AbiEvent, AbiParameter, ContractAbi};
pub use address::{decode_block_height, normalize_address, parse_address};
pub use artifact::{DeploymentArtifact, ReceiptRecord, TransactionRecord};
