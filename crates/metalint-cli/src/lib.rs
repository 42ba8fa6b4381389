//! # metalint-cli — Pre-commit Checks
//!
//! Provides the `metalint` command-line interface. Each subcommand maps to
//! one pre-commit hook:
//!
//! ```bash
//! metalint check-model-index model-index.yml
//! metalint check-algo-readme --model-index model-index.yml --debug
//! metalint check-ecosystem-validity ecosystem.yml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the checks, which live in
//!   `metalint-core` and `metalint-schema`.
//! - Diagnostics go to stdout, logs go to stderr.
//! - Handlers return the process exit code: 0 when everything is valid,
//!   1 otherwise.

pub mod algo_readme;
pub mod ecosystem;
pub mod model_index;
