//! Hex quantity encoding as used by `eth_*` methods.
//!
//! Quantities are `0x`-prefixed, lowercase, without leading zeros; zero is `0x0`.

use alloy_primitives::U256;
use thiserror::Error;

/// Error types for quantity parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("expected a hex string, got {0}")]
    NotAString(String),
    #[error("missing 0x prefix: {0}")]
    MissingPrefix(String),
    #[error("invalid hex quantity: {0}")]
    InvalidHex(String),
}

/// Formats a `u64` as a JSON-RPC quantity.
///
/// # Examples
/// ```
/// use nodecheck_core::utils::format_quantity;
///
/// assert_eq!(format_quantity(0), "0x0");
/// assert_eq!(format_quantity(500), "0x1f4");
/// ```
#[must_use]
pub fn format_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// Parses a JSON-RPC quantity into a `u64`.
///
/// # Errors
/// Returns [`QuantityError`] if the value is not a `0x`-prefixed hex string that fits in 64 bits.
pub fn parse_quantity(value: &serde_json::Value) -> Result<u64, QuantityError> {
    let digits = hex_digits(value)?;
    u64::from_str_radix(digits, 16).map_err(|_| QuantityError::InvalidHex(value.to_string()))
}

/// Parses a JSON-RPC quantity into a 256-bit integer.
///
/// Chain identifiers are quantities without an upper bound in the protocol, so
/// they are kept at full width rather than truncated to `u64`.
///
/// # Errors
/// Returns [`QuantityError`] if the value is not a `0x`-prefixed hex string that fits in 256 bits.
pub fn parse_quantity_u256(value: &serde_json::Value) -> Result<U256, QuantityError> {
    let digits = hex_digits(value)?;
    U256::from_str_radix(digits, 16).map_err(|_| QuantityError::InvalidHex(value.to_string()))
}

fn hex_digits(value: &serde_json::Value) -> Result<&str, QuantityError> {
    let s = value.as_str().ok_or_else(|| QuantityError::NotAString(value.to_string()))?;
    let digits = s.strip_prefix("0x").ok_or_else(|| QuantityError::MissingPrefix(s.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidHex(s.to_string()));
    }
    Ok(digits)
}
