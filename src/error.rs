//! Error types for the mod manager.
//!
//! Fatal conditions that callers (and tests) need to tell apart are typed here;
//! everything else travels as `anyhow::Error` with context.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with a mod's `modinfo.xml`.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("mod archive doesn't contain a modinfo.xml")]
    Missing,

    #[error("modinfo.xml is not valid UTF-8")]
    Encoding,

    #[error("failed to parse modinfo.xml: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("invalid value {value:?} for attribute '{attribute}'")]
    InvalidAttribute { attribute: String, value: String },

    #[error("{0:?} is not a valid version string")]
    InvalidVersion(String),

    #[error("'{element}' declares {files} file(s) but {locations} install location(s)")]
    LengthMismatch {
        element: String,
        files: usize,
        locations: usize,
    },

    #[error("{0:?} is not a valid file name")]
    InvalidFileName(String),
}

/// Errors raised while installing, uninstalling or configuring.
#[derive(Error, Debug)]
pub enum ModError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("mod archive doesn't contain {0}")]
    MissingArchiveFile(String),

    #[error("invalid mod ID {id}: {}", describe_count(.count))]
    InvalidModId { id: usize, count: usize },

    #[error("directory {0:?} doesn't exist")]
    DirectoryNotFound(PathBuf),

    #[error("{0:?} is not a regular file or doesn't exist")]
    ModFileNotFound(PathBuf),

    #[error("unsupported mod type {0:?} (expected .sporemod or .package)")]
    UnsupportedModType(PathBuf),

    #[error("an installed mod ({owner}) already contains {file_name}")]
    FileConflict { owner: String, file_name: String },

    #[error("installation of {0} was cancelled")]
    Cancelled(String),

    #[error("{0:?} is already in its install location")]
    SourceIsDestination(PathBuf),

    #[error("invalid mod ID {0:?}: expected a number or a START-END range with START < END")]
    InvalidIdArgument(String),
}

fn describe_count(count: &usize) -> String {
    match *count {
        0 => "no mods are installed".to_string(),
        1 => "the only valid ID is 0".to_string(),
        n => format!("valid IDs are 0 to {}", n - 1),
    }
}
