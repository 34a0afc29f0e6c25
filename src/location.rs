//! Symbolic install locations and their resolution to directories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One of the three roots a mod file can be installed into.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstallLocation {
    #[default]
    ModLibs,
    GalacticAdventuresData,
    CoreSporeData,
}

impl InstallLocation {
    pub const ALL: [InstallLocation; 3] = [
        InstallLocation::ModLibs,
        InstallLocation::GalacticAdventuresData,
        InstallLocation::CoreSporeData,
    ];

    /// Map a manifest `game` keyword to a location.
    ///
    /// `galacticadventures` and `spore` are recognised case-insensitively;
    /// anything else installs into ModLibs.
    pub fn from_game(keyword: &str) -> Self {
        match keyword.trim().to_lowercase().as_str() {
            "galacticadventures" => InstallLocation::GalacticAdventuresData,
            "spore" => InstallLocation::CoreSporeData,
            _ => InstallLocation::ModLibs,
        }
    }

    fn index(self) -> usize {
        match self {
            InstallLocation::ModLibs => 0,
            InstallLocation::GalacticAdventuresData => 1,
            InstallLocation::CoreSporeData => 2,
        }
    }
}

impl fmt::Display for InstallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallLocation::ModLibs => "ModLibs",
            InstallLocation::GalacticAdventuresData => "GalacticAdventuresData",
            InstallLocation::CoreSporeData => "CoreSporeData",
        };
        f.write_str(name)
    }
}

/// Lookup table from [`InstallLocation`] to a directory on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Locations {
    dirs: [PathBuf; 3],
}

impl Locations {
    pub fn new(
        mod_libs: PathBuf,
        galactic_adventures_data: PathBuf,
        core_spore_data: PathBuf,
    ) -> Self {
        Self {
            dirs: [mod_libs, galactic_adventures_data, core_spore_data],
        }
    }

    pub fn resolve(&self, location: InstallLocation) -> &Path {
        &self.dirs[location.index()]
    }

    /// Full destination path of `file_name` inside `location`.
    pub fn file_path(&self, location: InstallLocation, file_name: &str) -> PathBuf {
        self.resolve(location).join(file_name)
    }
}
