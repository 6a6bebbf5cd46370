use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{RelayError, Result};

/// Render bytes as a `0x`-prefixed lowercase hex string
pub fn to_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, with or without `0x` prefix
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| RelayError::Decode(format!("invalid hex data: {}", e)))
}

/// Decode a base64 attestation as returned by the legacy REST endpoints
pub fn decode_base64(value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| RelayError::Decode(format!("invalid base64 data: {}", e)))
}
