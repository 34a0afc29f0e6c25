//! Process information.

use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn executable_dir_impl(&self) -> Result<PathBuf> {
        let exe = env::current_exe().context("Failed to locate the running executable")?;
        exe.parent()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| anyhow!("Executable path {:?} has no parent directory", exe))
    }
}
