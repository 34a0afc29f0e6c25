use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use super::InstalledMods;
use crate::runtime::Runtime;

pub const REGISTRY_FILE_NAME: &str = "installed_mods.json";

/// Loads and persists the registry file in the data directory.
///
/// There is no locking: every operation loads a fresh copy and the last
/// writer wins.
pub struct RegistryStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> RegistryStore<'a, R> {
    pub fn new(runtime: &'a R, data_dir: &Path) -> Self {
        Self {
            runtime,
            path: data_dir.join(REGISTRY_FILE_NAME),
        }
    }

    /// Load the registry, or an empty one when the file does not exist yet.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<InstalledMods> {
        if !self.runtime.exists(&self.path) {
            debug!("No registry at {:?}, starting empty", self.path);
            return Ok(InstalledMods::default());
        }

        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read registry {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse registry {:?}", self.path))
    }

    /// Overwrite the registry file with `mods`.
    ///
    /// The content is written to a sibling temp file which then replaces the
    /// registry, so a crash never leaves a truncated file behind.
    #[tracing::instrument(skip(self, mods))]
    pub fn save(&self, mods: &InstalledMods) -> Result<()> {
        let content = serde_json::to_string_pretty(mods)?;
        let tmp_path = self.path.with_extension("json.tmp");

        self.runtime
            .write(&tmp_path, content.as_bytes())
            .with_context(|| format!("Failed to save registry to {:?}", tmp_path))?;
        self.runtime
            .rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace registry {:?}", self.path))?;

        debug!("Saved {} mod(s) to {:?}", mods.len(), self.path);
        Ok(())
    }
}
