//! # Model Index Check
//!
//! Loads an index file, follows its `Import` list and validates every
//! Collection and Model record of every metafile. Names must be unique
//! across the whole index.
//!
//! A broken index ends the run early with a failing report. A broken
//! metafile is recorded and the remaining imports are still checked.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use metalint_core::{record_name, IndexError, Metafile, ModelIndex, RecordKind};
use serde_json::Value;

use crate::report::{CheckReport, Finding, Subject};
use crate::validate::{SchemaValidator, Violation};

/// One declaration of a named record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOccurrence {
    /// Record kind.
    pub kind: RecordKind,
    /// Declared `Name`.
    pub name: String,
    /// Metafile holding the declaration.
    pub path: PathBuf,
}

/// Report every name declared more than once per record kind, listing each
/// declaring file in declaration order. Collections come before Models;
/// names are sorted within a kind.
pub fn check_global_uniqueness(occurrences: &[NameOccurrence]) -> Vec<Finding> {
    let mut grouped: BTreeMap<(RecordKind, &str), Vec<PathBuf>> = BTreeMap::new();
    for occurrence in occurrences {
        grouped
            .entry((occurrence.kind, occurrence.name.as_str()))
            .or_default()
            .push(occurrence.path.clone());
    }

    grouped
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|((kind, name), paths)| Finding::DuplicateName {
            kind,
            name: name.to_string(),
            paths,
        })
        .collect()
}

/// Validates model indexes with a shared [`SchemaValidator`].
#[derive(Debug)]
pub struct ModelIndexChecker<'a> {
    validator: &'a SchemaValidator,
}

impl<'a> ModelIndexChecker<'a> {
    /// Create a checker backed by `validator`.
    pub fn new(validator: &'a SchemaValidator) -> Self {
        Self { validator }
    }

    /// Validate one record of `kind`.
    pub fn validate_record(&self, kind: RecordKind, record: &Value) -> Vec<Violation> {
        match kind {
            RecordKind::Collection => self.validator.validate_collection(record),
            RecordKind::Model => self.validator.validate_model(record),
        }
    }

    /// Run the full check for the index at `index_path`.
    pub fn check(&self, index_path: &Path) -> CheckReport {
        let mut report = CheckReport::new();

        let index = match ModelIndex::load(index_path) {
            Ok(index) => index,
            Err(IndexError::Load(e)) => {
                report.push(Finding::from(e));
                return report;
            }
            Err(e) => {
                report.push_violations(
                    index_path,
                    Subject::Document,
                    vec![Violation::root(e.to_string())],
                );
                return report;
            }
        };

        let imports = index.resolve_imports();
        tracing::info!(
            index = %index_path.display(),
            imports = imports.len(),
            "checking model index"
        );

        let mut occurrences = Vec::new();
        for metafile_path in &imports {
            match Metafile::load(metafile_path) {
                Ok(metafile) => self.check_metafile(&metafile, &mut report, &mut occurrences),
                Err(e) => {
                    tracing::warn!(
                        path = %metafile_path.display(),
                        error = %e,
                        "skipping unloadable metafile"
                    );
                    report.push(Finding::from(e));
                }
            }
        }

        for finding in check_global_uniqueness(&occurrences) {
            report.push(finding);
        }

        tracing::info!(
            records = occurrences.len(),
            findings = report.findings().len(),
            "model index check finished"
        );
        report
    }

    fn check_metafile(
        &self,
        metafile: &Metafile,
        report: &mut CheckReport,
        occurrences: &mut Vec<NameOccurrence>,
    ) {
        if let Err(e) = metafile.root() {
            report.push_violations(
                metafile.path(),
                Subject::Document,
                vec![Violation::root(e.to_string())],
            );
            return;
        }

        for kind in RecordKind::ALL {
            let records = match metafile.records(kind) {
                Ok(records) => records,
                Err(e) => {
                    report.push_violations(
                        metafile.path(),
                        Subject::Document,
                        vec![Violation::root(e.to_string())],
                    );
                    continue;
                }
            };

            for (position, record) in records.iter().enumerate() {
                let label = match record_name(record) {
                    Some(name) => {
                        occurrences.push(NameOccurrence {
                            kind,
                            name: name.to_string(),
                            path: metafile.path().to_path_buf(),
                        });
                        name.to_string()
                    }
                    None => format!("<unnamed {} #{position}>", kind.group()),
                };

                let violations = self.validate_record(kind, record);
                report.push_violations(metafile.path(), Subject::Record { kind, label }, violations);
            }
        }
    }
}
