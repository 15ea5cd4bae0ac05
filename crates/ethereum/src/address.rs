//! Address normalization and hex quantity decoding

use alloy_primitives::Address;
use indexer_core::{Error, Result};

fn strip_hex_prefix(raw: &str) -> Option<&str> {
    raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))
}

/// Parse a `0x`-prefixed, 40 hex digit address
///
/// Letter case is not checked against the EIP-55 checksum; any casing of a
/// well-formed address is accepted.
pub fn parse_address(raw: &str) -> Result<Address> {
    let digits = strip_hex_prefix(raw).ok_or_else(|| Error::invalid_address(raw, "missing 0x prefix"))?;

    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(Error::invalid_address(raw, format!("non-hex character '{}'", c)));
    }

    if digits.len() != 40 {
        return Err(Error::invalid_address(
            raw,
            format!("expected 40 hex digits, found {}", digits.len()),
        ));
    }

    let bytes = hex::decode(digits).map_err(|e| Error::invalid_address(raw, e.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

/// Normalize an address to its EIP-55 checksummed form
pub fn normalize_address(raw: &str) -> Result<String> {
    Ok(parse_address(raw)?.to_checksum(None))
}

/// Decode a hex quantity such as a receipt's `blockNumber`
pub fn decode_block_height(raw: &str) -> Result<u64> {
    let digits = strip_hex_prefix(raw).unwrap_or(raw);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::malformed_height(raw));
    }

    u64::from_str_radix(digits, 16).map_err(|_| Error::malformed_height(raw))
}
