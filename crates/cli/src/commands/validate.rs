use nodecheck_core::config::AppConfig;
use std::path::Path;

use super::utils::{print_error, print_info, print_success, CliError, CliResult};

pub fn validate_config(file: &str) -> CliResult<()> {
    if !Path::new(file).exists() {
        print_error(&format!("Configuration file not found: {file}"));
        return Err(CliError::Config(format!("File not found: {file}")));
    }

    print_info(&format!("Loading configuration from {file}..."));
    let config = AppConfig::from_file(file)?;

    print_success("Configuration is valid!");

    let chains = config.nodes_by_chain();
    println!("Configuration Summary:");
    println!("  Upstreams: {}", config.upstream_config.upstreams.len());
    println!("  JSON-RPC nodes: {}", chains.values().map(Vec::len).sum::<usize>());
    for (chain, nodes) in &chains {
        println!("    {chain}: {} nodes", nodes.len());
    }
    println!(
        "  Checks: max_block_gap={}, block_hash_window={}, trace={}",
        config.checks.max_block_gap,
        config.checks.block_hash_window,
        config.checks.check_trace_capability
    );
    println!("  Logging: {} ({})", config.logging.level, config.logging.format);

    Ok(())
}
