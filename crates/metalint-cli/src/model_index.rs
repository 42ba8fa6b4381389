//! # check-model-index Subcommand
//!
//! Validates every Collection and Model record reachable from a model-index
//! file and enforces globally unique names.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use metalint_core::DEFAULT_INDEX_FILE;
use metalint_schema::{ModelIndexChecker, SchemaValidator};

/// Arguments for `metalint check-model-index`.
#[derive(Args, Debug)]
pub struct ModelIndexArgs {
    /// Model-index file path.
    #[arg(
        value_name = "FILE",
        default_value = DEFAULT_INDEX_FILE,
        env = "METALINT_MODEL_INDEX"
    )]
    pub filename: PathBuf,
}

/// Execute the check and print every finding to `out`.
///
/// Returns exit code: 0 when the index is valid, 1 otherwise.
pub fn run_check_model_index(args: &ModelIndexArgs, out: &mut dyn Write) -> Result<u8> {
    let validator = SchemaValidator::new().context("failed to compile schema tables")?;
    let report = ModelIndexChecker::new(&validator).check(&args.filename);

    write!(out, "{report}").context("failed to write report")?;
    Ok(report.exit_code())
}
