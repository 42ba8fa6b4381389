//! # metalint-core — Foundational Types for metalint
//!
//! Everything the checkers share lives here: the error taxonomy for loading
//! documents, the YAML loader (which hands back `serde_json::Value` so that
//! schema validation works on a single value model), the model-index and
//! metafile structure, and README summary extraction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `metalint-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Nothing here writes to stdout; callers render findings.

pub mod document;
pub mod error;
pub mod index;
pub mod readme;

pub use document::{kind_of, load, parse_yaml};
pub use error::{IndexError, LoadError, MetafileError};
pub use index::{record_name, Metafile, ModelIndex, RecordKind, DEFAULT_INDEX_FILE};
pub use readme::{
    check_algo_readmes, display_name, extract_readme, extract_summary, CollectionReadme,
    ReadmeFinding, ReadmeReport, ReadmeSummary,
};
