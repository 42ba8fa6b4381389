//! # metalint-schema — Schema Validation
//!
//! Validates Collection and Model records of a model index, and projects of
//! an ecosystem registry, against fixed field tables.
//!
//! ## Field Tables (`definitions`)
//!
//! Each record kind has a JSON Schema document built in code. The tables are
//! permissive: unknown fields pass, and only `Name` is required on records.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaValidator`] compiles every table once and returns all violations
//! of a record, each with the field path and the offending value.
//!
//! ## Checks (`model_index`, `ecosystem`)
//!
//! - [`ModelIndexChecker::check`] follows an index's imports, validates every
//!   record and enforces globally unique names.
//! - [`check_ecosystem_file`] validates every project of a registry file.
//!
//! Both accumulate into a [`CheckReport`] and never stop at the first
//! finding.
//!
//! ## Crate Policy
//!
//! - Depends only on `metalint-core` internally.
//! - Inputs are never mutated and nothing is written to disk.

pub mod definitions;
pub mod ecosystem;
pub mod model_index;
pub mod report;
pub mod validate;

pub use definitions::SchemaKind;
pub use ecosystem::{check_ecosystem_file, validate_project};
pub use model_index::{check_global_uniqueness, ModelIndexChecker, NameOccurrence};
pub use report::{CheckReport, Finding, Subject};
pub use validate::{SchemaValidationError, SchemaValidator, Violation};
