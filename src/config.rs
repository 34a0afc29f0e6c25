//! Directory configuration: where the three install roots live.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ModError;
use crate::location::{InstallLocation, Locations};
use crate::runtime::Runtime;

pub const CONFIG_FILE_NAME: &str = "directory_config.json";

/// Persisted mapping of install roots, relative paths are resolved
/// against the data directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    pub mod_libs: PathBuf,
    pub galactic_adventures_data: PathBuf,
    pub core_spore_data: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mod_libs: Path::new("..").join("ModLibs"),
            galactic_adventures_data: Path::new("..").join("..").join("DataEP1"),
            core_spore_data: Path::new("..").join("..").join("Data"),
        }
    }
}

/// Install roots given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathOverrides {
    pub mod_libs: Option<PathBuf>,
    pub galactic_adventures_data: Option<PathBuf>,
    pub core_spore_data: Option<PathBuf>,
}

impl PathOverrides {
    /// Make every given path absolute against the working directory.
    pub fn absolute<R: Runtime>(&self, runtime: &R) -> Result<Self> {
        let absolute = |path: &Option<PathBuf>| -> Result<Option<PathBuf>> {
            path.as_deref().map(|p| runtime.absolute(p)).transpose()
        };
        Ok(Self {
            mod_libs: absolute(&self.mod_libs)?,
            galactic_adventures_data: absolute(&self.galactic_adventures_data)?,
            core_spore_data: absolute(&self.core_spore_data)?,
        })
    }
}

impl DirectoryConfig {
    /// Load the configuration from `data_dir`, writing the defaults first
    /// if the file does not exist yet.
    #[tracing::instrument(skip(runtime))]
    pub fn load_or_create<R: Runtime>(runtime: &R, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !runtime.exists(&path) {
            info!("Creating default directory config at {:?}", path);
            let config = Self::default();
            config.save(runtime, data_dir)?;
            return Ok(config);
        }

        debug!("Loading directory config from {:?}", path);
        let content = runtime.read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse directory config {:?}", path))
    }

    /// Write the configuration to `data_dir`.
    pub fn save<R: Runtime>(&self, runtime: &R, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !runtime.exists(data_dir) {
            runtime.create_dir_all(data_dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        runtime
            .write(&path, content.as_bytes())
            .with_context(|| format!("Failed to save directory config to {:?}", path))
    }

    /// Replace the roots given in `overrides`.
    pub fn apply(&mut self, overrides: &PathOverrides) {
        if let Some(path) = &overrides.mod_libs {
            self.mod_libs = path.clone();
        }
        if let Some(path) = &overrides.galactic_adventures_data {
            self.galactic_adventures_data = path.clone();
        }
        if let Some(path) = &overrides.core_spore_data {
            self.core_spore_data = path.clone();
        }
    }

    /// Resolve every root against `data_dir` and check that it exists.
    pub fn resolve<R: Runtime>(&self, runtime: &R, data_dir: &Path) -> Result<Locations> {
        let locations = Locations::new(
            runtime.absolute(&data_dir.join(&self.mod_libs))?,
            runtime.absolute(&data_dir.join(&self.galactic_adventures_data))?,
            runtime.absolute(&data_dir.join(&self.core_spore_data))?,
        );

        for location in InstallLocation::ALL {
            let dir = locations.resolve(location);
            debug!("{} -> {:?}", location, dir);
            if !runtime.is_dir(dir) {
                return Err(ModError::DirectoryNotFound(dir.to_path_buf()).into());
            }
        }

        Ok(locations)
    }
}
