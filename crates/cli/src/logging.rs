use std::io::{self, IsTerminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 2] = ["nodecheck_core", "evm_node_check"];

fn crate_filter(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|c| format!("{c}={level}")));
    directives.join(",")
}

/// Builds the filter: `--verbose` wins, then `RUST_LOG`, then the configured level.
fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(crate_filter("debug"));
    }
    match std::env::var("RUST_LOG") {
        Ok(directive) if directive == "debug" || directive == "trace" => {
            EnvFilter::new(crate_filter(&directive))
        }
        Ok(_) => EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| EnvFilter::new(crate_filter(level))),
        Err(_) => EnvFilter::new(crate_filter(level)),
    }
}

/// Initializes the global subscriber with a `json` or `pretty` formatter.
///
/// Logs always go to stderr; stdout is reserved for the `--json` report.
pub fn init_logging(level: &str, format: &str, verbose: bool) {
    let registry = tracing_subscriber::registry().with(build_filter(level, verbose));

    if format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_writer(io::stderr);
        registry.with(fmt_layer).init();
    } else {
        // "pretty" and any other format default to pretty logging
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr);
        registry.with(fmt_layer).init();
    }
}
