use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::runtime::Runtime;

/// The data directory defaults to the directory holding the executable.
#[tracing::instrument(skip(runtime))]
pub fn default_data_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    runtime
        .executable_dir()
        .context("Could not determine the data directory, use --data-dir")
}
