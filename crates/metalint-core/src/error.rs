//! # Error Types
//!
//! Structured errors for loading documents and reading the index/metafile
//! structure, built with `thiserror`. Every variant carries the path of the
//! file it concerns so that callers can report it without extra context.

use std::path::PathBuf;

use thiserror::Error;

/// A document could not be turned into a value.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The path does not exist.
    #[error("File \"{}\" does not exist.", path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The path exists but could not be read.
    #[error("Failed to read \"{}\": {source}", path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The content is not well-formed structured data.
    #[error("Failed to parse \"{}\": {reason}", path.display())]
    Parse {
        /// Path whose content is malformed.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

impl LoadError {
    /// Path of the document that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path } | Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// The index file is unusable.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index file itself failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The root of the index is not a mapping.
    #[error("Expected the file \"{}\" to contain a mapping, but got {found}", path.display())]
    NotAMapping {
        /// Index path.
        path: PathBuf,
        /// Kind of value found at the root.
        found: &'static str,
    },

    /// The index has no `Import` key.
    #[error("Expected the file \"{}\" to declare an `Import` list", path.display())]
    MissingImport {
        /// Index path.
        path: PathBuf,
    },

    /// `Import` exists but is not a sequence.
    #[error("Expected `Import` in \"{}\" to be a list of paths, but got {found}", path.display())]
    ImportNotSequence {
        /// Index path.
        path: PathBuf,
        /// Kind of value found under `Import`.
        found: &'static str,
    },

    /// An `Import` entry is not a string.
    #[error("Expected `Import` entry #{position} in \"{}\" to be a path, but got {found}", path.display())]
    ImportEntryNotString {
        /// Index path.
        path: PathBuf,
        /// Zero-based position in the `Import` list.
        position: usize,
        /// Kind of value found.
        found: &'static str,
    },
}

/// A loaded metafile does not have the expected shape.
#[derive(Error, Debug)]
pub enum MetafileError {
    /// The root of the metafile is not a mapping.
    #[error("Expected the file \"{}\" to contain a mapping, but got {found}", path.display())]
    NotAMapping {
        /// Metafile path.
        path: PathBuf,
        /// Kind of value found at the root.
        found: &'static str,
    },

    /// `Collections` or `Models` is present but not a sequence.
    #[error("Expected `{section}` in \"{}\" to be a list, but got {found}", path.display())]
    SectionNotSequence {
        /// Metafile path.
        path: PathBuf,
        /// `Collections` or `Models`.
        section: &'static str,
        /// Kind of value found.
        found: &'static str,
    },
}
