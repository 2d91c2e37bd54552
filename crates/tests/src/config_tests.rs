//! Integration tests for loading configuration files from disk.

use nodecheck_core::config::{AppConfig, ConfigError};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("nodes.yaml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r"
upstream-config:
  upstreams:
    - id: eth-1
      chain: ethereum
      connectors:
        - type: json-rpc
          url: https://eth-1.example.com
    - id: eth-2
      chain: ethereum
      connectors:
        - type: json-rpc
          url: https://eth-2.example.com
checks:
  max_block_gap: 25
logging:
  level: debug
",
    );

    let config = AppConfig::from_file(&path).unwrap();

    assert_eq!(config.checks.max_block_gap, 25);
    assert_eq!(config.checks.block_hash_window, 5);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.nodes_by_chain()["ethereum"].len(), 2);
}

#[test]
fn test_duplicate_url_in_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r"
upstream-config:
  upstreams:
    - id: eth-1
      chain: ethereum
      connectors:
        - type: json-rpc
          url: https://node.example.com
        - type: json-rpc
          url: https://node.example.com
",
    );

    let err = AppConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateUrl(url) if url == "https://node.example.com"));
}

#[test]
fn test_malformed_yaml_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "upstream-config: [unterminated\n");

    assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Source(_))));
}

#[test]
fn test_upstream_without_json_rpc_connector_yields_no_chain() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r"
upstream-config:
  upstreams:
    - id: ws-only
      chain: polygon
      connectors:
        - type: websocket
          url: wss://polygon.example.com
",
    );

    let config = AppConfig::from_file(&path).unwrap();
    assert!(config.nodes_by_chain().is_empty());
    assert!(config.all_nodes().is_empty());
}
