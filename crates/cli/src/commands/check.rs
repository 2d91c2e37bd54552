use clap::Args;
use nodecheck_core::{
    checker::CheckReport,
    config::AppConfig,
    upstream::HttpClientConfig,
    CheckOptions, Checker,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::utils::CliResult;
use crate::logging::init_logging;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to YAML config file with nodes list
    #[arg(short, long)]
    pub config: String,

    /// Maximum allowed block gap between nodes (default: 10)
    #[arg(short = 'g', long)]
    pub max_block_gap: Option<u64>,

    /// Number of recent blocks to compare hashes (default: 5)
    #[arg(short = 'b', long)]
    pub block_hash_count: Option<u64>,

    /// Skip debug trace availability check
    #[arg(short = 's', long)]
    pub skip_debug_check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format, overrides the config file
    #[arg(long, value_parser = ["pretty", "json"])]
    pub log_format: Option<String>,

    /// Abort outstanding node calls after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Applies command-line overrides on top of the configured options.
    fn apply(&self, mut options: CheckOptions) -> CheckOptions {
        if let Some(gap) = self.max_block_gap {
            options.max_block_gap = gap;
        }
        if let Some(count) = self.block_hash_count {
            options.block_hash_window = count;
        }
        if self.skip_debug_check {
            options.check_trace_capability = false;
        }
        options
    }
}

/// Runs a full check and returns whether every chain passed.
pub async fn run_check(args: CheckArgs) -> CliResult<bool> {
    let config = AppConfig::from_file(&args.config)?;

    let format = args.log_format.as_deref().unwrap_or(&config.logging.format);
    init_logging(&config.logging.level, format, args.verbose);

    let chains = config.nodes_by_chain();
    info!(
        chains = chains.len(),
        total_nodes = chains.values().map(Vec::len).sum::<usize>(),
        "loaded config"
    );

    let options = args.apply(config.checks);
    let checker = Checker::with_http(options, &HttpClientConfig::default())?;

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, args.timeout.map(Duration::from_secs));

    let report = checker.check(&chains, &cancel).await?;
    print_results(&report);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.passed {
        info!("all nodes passed checks");
    } else {
        error!("some nodes failed checks");
    }
    Ok(report.passed)
}

/// Cancels `cancel` on Ctrl-C or once `timeout` elapses.
fn spawn_cancel_triggers(cancel: &CancellationToken, timeout: Option<Duration>) {
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    warn!("interrupt received, cancelling outstanding node calls");
                    token.cancel();
                }
            }
        }
    });

    if let Some(timeout) = timeout {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(timeout) => {
                    warn!(
                        timeout_secs = timeout.as_secs(),
                        "check timed out, cancelling outstanding node calls"
                    );
                    token.cancel();
                }
            }
        });
    }
}

fn print_results(report: &CheckReport) {
    for chain in &report.chains {
        info!(
            chain = %chain.chain,
            chain_id = %chain.expected_network_id.map_or_else(|| "unknown".to_string(), |id| id.to_string()),
            max_block_number = chain.max_height,
            total_nodes = chain.nodes.len(),
            failed_nodes = chain.failed_nodes.len(),
            "chain results"
        );

        for node in &chain.nodes {
            let Some(snapshot) = node.snapshot() else {
                continue;
            };
            if chain.is_node_healthy(&node.node.address) {
                info!(
                    id = %node.node.id,
                    chain = %node.node.chain,
                    block_number = snapshot.height,
                    debug_ok = snapshot.trace_capable,
                    "node OK"
                );
            }
        }
    }

    if !report.all_failures.is_empty() {
        warn!("failed nodes detected");
        for failure in &report.all_failures {
            error!(
                id = %failure.node_id,
                chain = %failure.chain,
                address = %failure.address,
                reason = %failure.reason,
                "node FAILED"
            );
        }
    }
}
