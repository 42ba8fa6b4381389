//! # check-ecosystem-validity Subcommand
//!
//! Validates ecosystem registry files. Every file and every project is
//! checked before the exit code is decided.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use metalint_schema::{check_ecosystem_file, CheckReport, SchemaValidator};

/// Arguments for `metalint check-ecosystem-validity`.
#[derive(Args, Debug)]
pub struct EcosystemArgs {
    /// Ecosystem registry YAML files.
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub input_files: Vec<PathBuf>,
}

/// Execute the check over every input file.
///
/// Returns exit code: 0 when every project is valid, 1 otherwise.
pub fn run_check_ecosystem(args: &EcosystemArgs, out: &mut dyn Write) -> Result<u8> {
    let validator = SchemaValidator::new().context("failed to compile schema tables")?;

    let mut report = CheckReport::new();
    for path in &args.input_files {
        report.merge(check_ecosystem_file(&validator, path));
    }

    write!(out, "{report}").context("failed to write report")?;
    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "- repo_url: https://github.com/a/b\n  paper_url: ''\n  type: Demo\n  mmrepos: [MMCV]\n  tags: [demo]\n  summary: {zh: 演示, en: demo}\n";

    #[test]
    fn all_files_are_checked() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yml");
        let bad = dir.path().join("bad.yml");
        std::fs::write(&good, GOOD).unwrap();
        std::fs::write(&bad, GOOD.replace("https://github.com/", "https://example.com/")).unwrap();

        let mut out = Vec::new();
        let args = EcosystemArgs {
            input_files: vec![bad.clone(), good.clone()],
        };
        assert_eq!(run_check_ecosystem(&args, &mut out).unwrap(), 1);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains(&bad.display().to_string()));
        assert!(!output.contains(&good.display().to_string()));

        let mut out = Vec::new();
        let args = EcosystemArgs {
            input_files: vec![good],
        };
        assert_eq!(run_check_ecosystem(&args, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
