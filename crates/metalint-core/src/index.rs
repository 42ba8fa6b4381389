//! # Model Index and Metafiles
//!
//! The index file is a mapping with a single `Import` list of metafile paths,
//! resolved relative to the directory holding the index. Each metafile may
//! declare `Collections` and `Models`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::document::{self, kind_of};
use crate::error::{IndexError, LoadError, MetafileError};

/// Conventional name of the index file.
pub const DEFAULT_INDEX_FILE: &str = "model-index.yml";

/// The two record kinds a metafile can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    /// An entry of `Collections`.
    Collection,
    /// An entry of `Models`.
    Model,
}

impl RecordKind {
    /// Both kinds, in report order.
    pub const ALL: [RecordKind; 2] = [RecordKind::Collection, RecordKind::Model];

    /// Metafile key holding records of this kind.
    pub fn section(self) -> &'static str {
        match self {
            Self::Collection => "Collections",
            Self::Model => "Models",
        }
    }

    /// Lower-case plural used when grouping errors per file.
    pub fn group(self) -> &'static str {
        match self {
            Self::Collection => "collections",
            Self::Model => "models",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => f.write_str("Collection"),
            Self::Model => f.write_str("Model"),
        }
    }
}

/// The `Name` of a record, if present and a string.
pub fn record_name(record: &Value) -> Option<&str> {
    record.get("Name").and_then(Value::as_str)
}

/// A parsed index file.
#[derive(Debug, Clone)]
pub struct ModelIndex {
    path: PathBuf,
    imports: Vec<String>,
}

impl ModelIndex {
    /// Load and parse the index at `path`.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let document = document::load(path)?;
        Self::from_document(path, &document)
    }

    /// Interpret an already loaded document as an index.
    ///
    /// # Errors
    ///
    /// Fails when the root is not a mapping, `Import` is missing or not a
    /// list, or an entry is not a string.
    pub fn from_document(path: &Path, document: &Value) -> Result<Self, IndexError> {
        let root = document.as_object().ok_or_else(|| IndexError::NotAMapping {
            path: path.to_path_buf(),
            found: kind_of(document),
        })?;

        let import = root.get("Import").ok_or_else(|| IndexError::MissingImport {
            path: path.to_path_buf(),
        })?;

        let entries = import
            .as_array()
            .ok_or_else(|| IndexError::ImportNotSequence {
                path: path.to_path_buf(),
                found: kind_of(import),
            })?;

        let imports = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| IndexError::ImportEntryNotString {
                        path: path.to_path_buf(),
                        position,
                        found: kind_of(entry),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            imports,
        })
    }

    /// Path of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Import` entries as written.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Directory that relative paths in the index are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolve a path written in the index (or in a metafile it imports)
    /// against the index directory. Absolute paths are kept.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.base_dir().join(relative)
    }

    /// `Import` entries resolved against the index directory, in order.
    pub fn resolve_imports(&self) -> Vec<PathBuf> {
        self.imports.iter().map(|entry| self.resolve(entry)).collect()
    }
}

/// A loaded metafile.
#[derive(Debug, Clone)]
pub struct Metafile {
    path: PathBuf,
    document: Value,
}

impl Metafile {
    /// Load the metafile at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let document = document::load(path)?;
        Ok(Self::new(path, document))
    }

    /// Wrap an already loaded document.
    pub fn new(path: &Path, document: Value) -> Self {
        Self {
            path: path.to_path_buf(),
            document,
        }
    }

    /// Path the metafile was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level mapping of the metafile.
    ///
    /// # Errors
    ///
    /// Fails when the root is not a mapping.
    pub fn root(&self) -> Result<&Map<String, Value>, MetafileError> {
        self.document
            .as_object()
            .ok_or_else(|| MetafileError::NotAMapping {
                path: self.path.clone(),
                found: kind_of(&self.document),
            })
    }

    /// Records of `kind`. A missing or null section yields no records.
    ///
    /// # Errors
    ///
    /// Fails when the root is not a mapping or the section is not a list.
    pub fn records(&self, kind: RecordKind) -> Result<&[Value], MetafileError> {
        match self.root()?.get(kind.section()) {
            None | Some(Value::Null) => Ok(&[][..]),
            Some(Value::Array(records)) => Ok(records.as_slice()),
            Some(other) => Err(MetafileError::SectionNotSequence {
                path: self.path.clone(),
                section: kind.section(),
                found: kind_of(other),
            }),
        }
    }
}
