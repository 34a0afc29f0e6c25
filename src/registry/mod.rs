//! The installed-mods registry: which mod placed which files where.

mod store;

use serde::{Deserialize, Serialize};

use crate::location::InstallLocation;

pub use store::{REGISTRY_FILE_NAME, RegistryStore};

/// One file placed by a mod.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstalledModFile {
    pub file_name: String,
    #[serde(default)]
    pub install_location: InstallLocation,
}

/// A mod as recorded in the registry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InstalledMod {
    pub name: String,
    pub unique_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<InstalledModFile>,
}

/// Ordered list of installed mods. The position of a mod is its user-facing ID.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InstalledMods {
    #[serde(default)]
    pub installed_mods: Vec<InstalledMod>,
}

impl InstalledMods {
    pub fn len(&self) -> usize {
        self.installed_mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed_mods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InstalledMod> {
        self.installed_mods.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstalledMod> {
        self.installed_mods.iter()
    }

    /// Position of the mod with the given unique name.
    pub fn position(&self, unique_name: &str) -> Option<usize> {
        self.installed_mods
            .iter()
            .position(|m| m.unique_name == unique_name)
    }

    /// Remove the mod with the given unique name, returning its former position.
    pub fn take(&mut self, unique_name: &str) -> Option<(usize, InstalledMod)> {
        let index = self.position(unique_name)?;
        Some((index, self.installed_mods.remove(index)))
    }

    /// Insert at `index`, or append when `index` is past the end.
    pub fn insert(&mut self, index: usize, installed_mod: InstalledMod) {
        let index = index.min(self.installed_mods.len());
        self.installed_mods.insert(index, installed_mod);
    }

    pub fn push(&mut self, installed_mod: InstalledMod) {
        self.installed_mods.push(installed_mod);
    }

    /// The mod, other than `except_unique_name`, that already owns `file`.
    ///
    /// File names are compared case-insensitively since the game runs on
    /// case-insensitive file systems.
    pub fn owner_of(
        &self,
        file: &InstalledModFile,
        except_unique_name: &str,
    ) -> Option<&InstalledMod> {
        self.installed_mods
            .iter()
            .filter(|m| m.unique_name != except_unique_name)
            .find(|m| {
                m.files.iter().any(|f| {
                    f.install_location == file.install_location
                        && f.file_name.eq_ignore_ascii_case(&file.file_name)
                })
            })
    }
}
