//! # Algorithm README Summaries
//!
//! Every Collection points at a README that carries two marked sections: an
//! abstract introduced by a line containing `[ABSTRACT]`, and a
//! representative image introduced by a line containing `[IMAGE]`. The
//! summary is the first non-blank line after the abstract marker and the
//! first quoted `src=` value after the image marker.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IndexError, LoadError, MetafileError};
use crate::index::{record_name, Metafile, ModelIndex, RecordKind};

const ABSTRACT_MARKER: &str = "[ABSTRACT]";
const IMAGE_MARKER: &str = "[IMAGE]";

static SRC_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src=.*?"(.*?)""#).expect("src link regex must compile"));

static DISPLAY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("display name regex must compile"));

/// What was extracted from one README.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadmeSummary {
    /// First non-blank line after the abstract marker.
    pub abstract_line: Option<String>,
    /// Image link after the image marker.
    pub image: Option<String>,
}

impl ReadmeSummary {
    /// Both sections were found.
    pub fn is_complete(&self) -> bool {
        self.abstract_line.is_some() && self.image.is_some()
    }
}

/// Extract the abstract and image from README text.
pub fn extract_summary(text: &str) -> ReadmeSummary {
    let mut summary = ReadmeSummary::default();
    let mut in_abstract = false;
    let mut in_image = false;

    for line in text.lines() {
        if in_abstract && summary.abstract_line.is_none() && !line.trim().is_empty() {
            summary.abstract_line = Some(line.trim_end().to_string());
        }
        if !in_abstract {
            in_abstract = line.contains(ABSTRACT_MARKER);
        }

        if in_image && summary.image.is_none() {
            if let Some(link) = SRC_LINK.captures(line).and_then(|c| c.get(1)) {
                summary.image = Some(link.as_str().to_string());
            }
        }
        if !in_image {
            in_image = line.contains(IMAGE_MARKER);
        }
    }

    summary
}

/// Extract the summary of the README at `path`. A missing or unreadable file
/// yields an empty summary.
pub fn extract_readme(path: &Path) -> ReadmeSummary {
    match std::fs::read_to_string(path) {
        Ok(text) => extract_summary(&text),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "README not readable");
            ReadmeSummary::default()
        }
    }
}

/// Display name of a collection: the first bracketed text if any, e.g.
/// `"[HRNet](https://...)"` displays as `HRNet`.
pub fn display_name(name: &str) -> &str {
    DISPLAY_NAME
        .captures(name)
        .and_then(|c| c.get(1))
        .map_or(name, |m| m.as_str())
}

/// One collection's README outcome.
#[derive(Debug, Clone)]
pub struct CollectionReadme {
    /// Display name of the collection.
    pub name: String,
    /// Resolved README path.
    pub readme_path: PathBuf,
    /// Extracted summary.
    pub summary: ReadmeSummary,
}

/// A reason the README check failed.
#[derive(Debug)]
pub enum ReadmeFinding {
    /// The index could not be used.
    Index(IndexError),
    /// An imported metafile could not be loaded.
    Metafile(LoadError),
    /// A metafile has the wrong shape.
    MetafileShape(MetafileError),
    /// A Collection has no `README` string.
    MissingReadmeField {
        /// Metafile declaring the collection.
        metafile: PathBuf,
        /// Collection label.
        collection: String,
    },
    /// No abstract found.
    MissingAbstract {
        /// README that was scanned.
        readme_path: PathBuf,
    },
    /// No image found.
    MissingImage {
        /// README that was scanned.
        readme_path: PathBuf,
    },
}

impl fmt::Display for ReadmeFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(e) => write!(f, "{e}"),
            Self::Metafile(e) => write!(f, "{e}"),
            Self::MetafileShape(e) => write!(f, "{e}"),
            Self::MissingReadmeField {
                metafile,
                collection,
            } => write!(
                f,
                "Collection \"{collection}\" in \"{}\" has no README field.",
                metafile.display()
            ),
            Self::MissingAbstract { readme_path } => write!(
                f,
                "Failed to extract abstract field from readme, please check {} again.",
                readme_path.display()
            ),
            Self::MissingImage { readme_path } => write!(
                f,
                "Failed to extract image field from readme, please check {} again.",
                readme_path.display()
            ),
        }
    }
}

/// Outcome of checking every collection README reachable from an index.
#[derive(Debug, Default)]
pub struct ReadmeReport {
    /// Every collection that had a README path, in import order.
    pub collections: Vec<CollectionReadme>,
    /// Every failure, in discovery order.
    pub findings: Vec<ReadmeFinding>,
}

impl ReadmeReport {
    /// No failures.
    pub fn is_success(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Check the README of every Collection declared by the metafiles that the
/// index at `index_path` imports. README paths are resolved against the
/// index directory.
pub fn check_algo_readmes(index_path: &Path) -> ReadmeReport {
    let mut report = ReadmeReport::default();

    let index = match ModelIndex::load(index_path) {
        Ok(index) => index,
        Err(e) => {
            report.findings.push(ReadmeFinding::Index(e));
            return report;
        }
    };

    for metafile_path in index.resolve_imports() {
        let metafile = match Metafile::load(&metafile_path) {
            Ok(metafile) => metafile,
            Err(e) => {
                tracing::warn!(path = %metafile_path.display(), "skipping unloadable metafile");
                report.findings.push(ReadmeFinding::Metafile(e));
                continue;
            }
        };

        let collections = match metafile.records(RecordKind::Collection) {
            Ok(records) => records,
            Err(e) => {
                report.findings.push(ReadmeFinding::MetafileShape(e));
                continue;
            }
        };

        for (position, collection) in collections.iter().enumerate() {
            let name = record_name(collection)
                .map(|n| display_name(n).to_string())
                .unwrap_or_else(|| format!("<unnamed collection #{position}>"));

            let Some(readme) = collection.get("README").and_then(|v| v.as_str()) else {
                report.findings.push(ReadmeFinding::MissingReadmeField {
                    metafile: metafile_path.clone(),
                    collection: name,
                });
                continue;
            };

            let readme_path = index.resolve(readme);
            let summary = extract_readme(&readme_path);
            if summary.abstract_line.is_none() {
                report.findings.push(ReadmeFinding::MissingAbstract {
                    readme_path: readme_path.clone(),
                });
            }
            if summary.image.is_none() {
                report.findings.push(ReadmeFinding::MissingImage {
                    readme_path: readme_path.clone(),
                });
            }

            report.collections.push(CollectionReadme {
                name,
                readme_path,
                summary,
            });
        }
    }

    tracing::info!(
        collections = report.collections.len(),
        failures = report.findings.len(),
        "checked collection READMEs"
    );
    report
}
