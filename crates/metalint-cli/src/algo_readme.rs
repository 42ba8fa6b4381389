//! # check-algo-readme Subcommand
//!
//! Checks that every Collection README reachable from a model-index file
//! carries an abstract and a representative image.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use metalint_core::{check_algo_readmes, DEFAULT_INDEX_FILE};

/// Arguments for `metalint check-algo-readme`.
#[derive(Args, Debug)]
pub struct AlgoReadmeArgs {
    /// Model-index file path.
    #[arg(
        long,
        value_name = "FILE",
        default_value = DEFAULT_INDEX_FILE,
        env = "METALINT_MODEL_INDEX"
    )]
    pub model_index: PathBuf,

    /// Report problems but always exit 0.
    #[arg(long)]
    pub dry_run: bool,

    /// Print what was extracted from each README.
    #[arg(long)]
    pub debug: bool,
}

/// Execute the check.
///
/// Returns exit code: 0 when every README is complete (or `--dry-run`),
/// 1 otherwise.
pub fn run_check_algo_readme(args: &AlgoReadmeArgs, out: &mut dyn Write) -> Result<u8> {
    let report = check_algo_readmes(&args.model_index);

    for finding in &report.findings {
        writeln!(out, "{finding}").context("failed to write report")?;
    }

    if args.debug {
        for collection in &report.collections {
            let entry = json!({
                "name": collection.name,
                "readmePath": collection.readme_path.display().to_string(),
                "introduction": collection.summary.abstract_line,
                "image": collection.summary.image,
            });
            let rendered =
                serde_json::to_string_pretty(&entry).context("failed to render README summary")?;
            writeln!(out, "{rendered}").context("failed to write report")?;
        }
    }

    if args.dry_run || report.is_success() {
        Ok(0)
    } else {
        Ok(1)
    }
}
