//! # metalint CLI Entry Point
//!
//! Parses command-line arguments, sets up logging and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use metalint_cli::algo_readme::{run_check_algo_readme, AlgoReadmeArgs};
use metalint_cli::ecosystem::{run_check_ecosystem, EcosystemArgs};
use metalint_cli::model_index::{run_check_model_index, ModelIndexArgs};

/// Pre-commit checks for model-index metafiles, algorithm READMEs and the
/// ecosystem project registry.
#[derive(Parser, Debug)]
#[command(name = "metalint", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(
        long,
        value_enum,
        default_value_t = LogFormat::Text,
        env = "METALINT_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate Collection and Model records reachable from a model index.
    CheckModelIndex(ModelIndexArgs),

    /// Check that every Collection README has an abstract and an image.
    CheckAlgoReadme(AlgoReadmeArgs),

    /// Validate ecosystem project registry files.
    CheckEcosystemValidity(EcosystemArgs),
}

fn init_tracing(verbose: u8, format: LogFormat) {
    // RUST_LOG wins over the verbosity flag.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(command = ?cli.command, "metalint starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::CheckModelIndex(args) => run_check_model_index(&args, &mut out),
        Commands::CheckAlgoReadme(args) => run_check_algo_readme(&args, &mut out),
        Commands::CheckEcosystemValidity(args) => run_check_ecosystem(&args, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
