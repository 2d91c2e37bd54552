use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod logging;
use commands::{run_check, validate_config, CheckArgs};

#[derive(Parser)]
#[command(name = "evm-node-check")]
#[command(about = "Check EVM RPC nodes for consistency", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every configured node and report inconsistencies
    Check(CheckArgs),

    /// Load and validate a configuration file without contacting any node
    Validate {
        /// Path to YAML config file with nodes list
        #[arg(short, long)]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => {
            let passed = run_check(args).await?;
            Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Validate { config } => {
            validate_config(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
