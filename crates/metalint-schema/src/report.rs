//! # Check Reports
//!
//! Every checker accumulates [`Finding`]s into a [`CheckReport`] and never
//! stops early. The report decides the exit status and renders the
//! human-readable diagnostics.

use std::fmt;
use std::path::{Path, PathBuf};

use metalint_core::{LoadError, RecordKind};

use crate::validate::Violation;

/// What a schema violation is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The document as a whole (root shape, index layout).
    Document,
    /// A Collection or Model record.
    Record {
        /// Record kind.
        kind: RecordKind,
        /// `Name` of the record, or a positional label when it has none.
        label: String,
    },
    /// One project of an ecosystem registry.
    Project {
        /// Zero-based position in the registry.
        position: usize,
        /// `repo_url` if it is a string.
        repo_url: Option<String>,
    },
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => f.write_str("document"),
            Self::Record { kind, label } => write!(f, "{}: {label}", kind.group()),
            Self::Project {
                position,
                repo_url: Some(url),
            } => write!(f, "project #{position} ({url})"),
            Self::Project {
                position,
                repo_url: None,
            } => write!(f, "project #{position}"),
        }
    }
}

/// One reason a check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// A file does not exist.
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },
    /// A file exists but could not be read.
    ReadFailure {
        /// File path.
        path: PathBuf,
        /// I/O error message.
        reason: String,
    },
    /// A file was read but is not valid YAML.
    ParseFailure {
        /// File path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
    /// Content does not satisfy its schema or a field check.
    SchemaViolation {
        /// File the content came from.
        path: PathBuf,
        /// What inside the file is at fault.
        subject: Subject,
        /// Field-level reasons.
        violations: Vec<Violation>,
    },
    /// A name is declared more than once.
    DuplicateName {
        /// Record kind.
        kind: RecordKind,
        /// Duplicated name.
        name: String,
        /// Path of every declaration, in import order.
        paths: Vec<PathBuf>,
    },
}

impl From<LoadError> for Finding {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound { path } => Self::FileNotFound { path },
            LoadError::Read { path, source } => Self::ReadFailure {
                path,
                reason: source.to_string(),
            },
            LoadError::Parse { path, reason } => Self::ParseFailure { path, reason },
        }
    }
}

/// Accumulated findings of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    findings: Vec<Finding>,
}

impl CheckReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Record a schema violation unless `violations` is empty.
    pub fn push_violations(&mut self, path: &Path, subject: Subject, violations: Vec<Violation>) {
        if !violations.is_empty() {
            self.findings.push(Finding::SchemaViolation {
                path: path.to_path_buf(),
                subject,
                violations,
            });
        }
    }

    /// Append every finding of `other`.
    pub fn merge(&mut self, other: CheckReport) {
        self.findings.extend(other.findings);
    }

    /// All findings, in discovery order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// No findings.
    pub fn is_success(&self) -> bool {
        self.findings.is_empty()
    }

    /// 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    fn is_document_level(finding: &Finding) -> bool {
        matches!(
            finding,
            Finding::FileNotFound { .. }
                | Finding::ReadFailure { .. }
                | Finding::ParseFailure { .. }
                | Finding::SchemaViolation {
                    subject: Subject::Document,
                    ..
                }
        )
    }
}

/// Renders file-level problems first, then duplicate names, then record
/// errors grouped under their file.
impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in self.findings.iter().filter(|x| Self::is_document_level(x)) {
            match finding {
                Finding::FileNotFound { path } => {
                    writeln!(f, "File \"{}\" does not exist.", path.display())?
                }
                Finding::ReadFailure { path, reason } => {
                    writeln!(f, "Failed to read \"{}\": {reason}", path.display())?
                }
                Finding::ParseFailure { path, reason } => {
                    writeln!(f, "Failed to parse \"{}\": {reason}", path.display())?
                }
                // Document-level messages already name their file.
                Finding::SchemaViolation { violations, .. } => {
                    for violation in violations {
                        writeln!(f, "{}", violation.message)?;
                    }
                }
                Finding::DuplicateName { .. } => {}
            }
        }

        for finding in &self.findings {
            if let Finding::DuplicateName { kind, name, paths } = finding {
                writeln!(f, "{kind} \"{name}\" is defined in multiple places:")?;
                for path in paths {
                    writeln!(f, "\t{}", path.display())?;
                }
            }
        }

        let mut files: Vec<&Path> = Vec::new();
        for finding in &self.findings {
            if let Finding::SchemaViolation { path, subject, .. } = finding {
                if *subject != Subject::Document && !files.contains(&path.as_path()) {
                    files.push(path.as_path());
                }
            }
        }

        for file in files {
            writeln!(f)?;
            writeln!(f, "{}", file.display())?;
            for finding in &self.findings {
                let Finding::SchemaViolation {
                    path,
                    subject,
                    violations,
                } = finding
                else {
                    continue;
                };
                if path != file || *subject == Subject::Document {
                    continue;
                }
                writeln!(f, "\t{subject}")?;
                for violation in violations {
                    writeln!(f, "\t\t{violation}")?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_violation(path: &str, label: &str, message: &str) -> Finding {
        Finding::SchemaViolation {
            path: PathBuf::from(path),
            subject: Subject::Record {
                kind: RecordKind::Model,
                label: label.to_string(),
            },
            violations: vec![Violation {
                instance_path: "/Weights".to_string(),
                schema_path: "/properties/Weights/type".to_string(),
                message: message.to_string(),
            }],
        }
    }

    #[test]
    fn empty_report_succeeds() {
        let report = CheckReport::new();
        assert!(report.is_success());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn empty_violations_are_not_recorded() {
        let mut report = CheckReport::new();
        report.push_violations(Path::new("a.yml"), Subject::Document, Vec::new());
        assert!(report.is_success());
    }

    #[test]
    fn render_orders_sections() {
        let mut report = CheckReport::new();
        report.push(record_violation("b/metafile.yml", "resnet50", "3 is not of type \"string\""));
        report.push(Finding::DuplicateName {
            kind: RecordKind::Collection,
            name: "Foo".to_string(),
            paths: vec![PathBuf::from("a/metafile.yml"), PathBuf::from("b/metafile.yml")],
        });
        report.push(Finding::FileNotFound {
            path: PathBuf::from("c/metafile.yml"),
        });

        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.to_string(),
            "File \"c/metafile.yml\" does not exist.\n\
             Collection \"Foo\" is defined in multiple places:\n\
             \ta/metafile.yml\n\
             \tb/metafile.yml\n\
             \n\
             b/metafile.yml\n\
             \tmodels: resnet50\n\
             \t\t/Weights: 3 is not of type \"string\"\n"
        );
    }

    #[test]
    fn record_errors_group_by_file() {
        let mut report = CheckReport::new();
        report.push(record_violation("a.yml", "m1", "bad"));
        report.push(record_violation("b.yml", "m2", "bad"));
        report.push(record_violation("a.yml", "m3", "bad"));

        let rendered = report.to_string();
        let a = rendered.find("\na.yml\n").unwrap();
        let m3 = rendered.find("models: m3").unwrap();
        let b = rendered.find("\nb.yml\n").unwrap();
        assert!(a < m3 && m3 < b, "{rendered}");
    }

    #[test]
    fn load_errors_convert() {
        let finding = Finding::from(LoadError::Parse {
            path: PathBuf::from("x.yml"),
            reason: "invalid YAML".to_string(),
        });
        assert_eq!(
            finding,
            Finding::ParseFailure {
                path: PathBuf::from("x.yml"),
                reason: "invalid YAML".to_string()
            }
        );
    }

    #[test]
    fn read_errors_are_not_parse_errors() {
        let finding = Finding::from(LoadError::Read {
            path: PathBuf::from("configs"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "Is a directory"),
        });
        assert!(matches!(finding, Finding::ReadFailure { .. }));

        let mut report = CheckReport::new();
        report.push(finding);
        assert_eq!(report.to_string(), "Failed to read \"configs\": Is a directory\n");
    }

    #[test]
    fn document_violation_is_printed_once() {
        let mut report = CheckReport::new();
        report.push_violations(
            Path::new("m.yml"),
            Subject::Document,
            vec![Violation::root(
                "Expected the file \"m.yml\" to contain a mapping, but got sequence",
            )],
        );
        assert_eq!(
            report.to_string(),
            "Expected the file \"m.yml\" to contain a mapping, but got sequence\n"
        );
    }

    #[test]
    fn project_subject_display() {
        let subject = Subject::Project {
            position: 2,
            repo_url: Some("https://github.com/a/b".to_string()),
        };
        assert_eq!(subject.to_string(), "project #2 (https://github.com/a/b)");
    }
}
