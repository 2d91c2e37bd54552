//! Small helpers for Ethereum JSON-RPC quantity encoding.

pub mod quantity;

pub use quantity::{format_quantity, parse_quantity, parse_quantity_u256, QuantityError};
