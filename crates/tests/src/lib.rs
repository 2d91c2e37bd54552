//! Integration Tests for the EVM Node Checker
//!
//! This crate contains:
//!
//! - `checker_tests`: End-to-end checks over the real HTTP transport against mock nodes
//! - `config_tests`: Loading and validating configuration files from disk
//! - `mock_infrastructure`: Reusable mockito-based JSON-RPC node mocks
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```


#[cfg(test)]
mod config_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;
