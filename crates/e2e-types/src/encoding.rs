//! Hex and BCS decoding for values the node returns as JSON.
//!
//! Token property values and template property values come back as
//! `0x`-prefixed hex strings holding BCS bytes; integers wider than 32 bits
//! come back as decimal strings.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

// =============================================================================
// Hex
// =============================================================================

/// Parse a hex string (with or without 0x prefix) to raw bytes.
///
/// `context` names the value for error messages.
pub fn parse_hex_bytes(hex_str: &str, context: &str) -> Result<Vec<u8>> {
    let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(stripped).map_err(|e| anyhow!("Invalid {} hex '{}': {}", context, hex_str, e))
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn hex_literal(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// =============================================================================
// BCS
// =============================================================================

/// Decode a hex-encoded BCS value.
pub fn decode_bcs_hex<T: DeserializeOwned>(hex_str: &str, context: &str) -> Result<T> {
    let bytes = parse_hex_bytes(hex_str, context)?;
    bcs::from_bytes(&bytes).map_err(|e| anyhow!("Failed to BCS-decode {}: {}", context, e))
}

/// Decode a hex-encoded BCS `u64` (e.g. the `Template` token property).
pub fn decode_bcs_u64(hex_str: &str) -> Result<u64> {
    decode_bcs_hex(hex_str, "u64 value")
}

/// Decode a hex-encoded BCS `0x1::string::String`.
pub fn decode_bcs_string(hex_str: &str) -> Result<String> {
    decode_bcs_hex(hex_str, "string value")
}

/// Decode a hex-encoded BCS `bool` (e.g. `TOKEN_BURNABLE_BY_OWNER`).
pub fn decode_bcs_bool(hex_str: &str) -> Result<bool> {
    decode_bcs_hex(hex_str, "bool value")
}

// =============================================================================
// JSON numbers
// =============================================================================

/// Read an unsigned integer the node may encode as a string or a number.
pub fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Read `value[field]` as an unsigned integer.
pub fn json_u64_field(value: &Value, field: &str) -> Option<u64> {
    value.get(field).and_then(json_u64)
}
