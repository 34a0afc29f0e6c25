//! List use case - shows the registry with the IDs used by uninstall.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use log::info;

use crate::registry::{InstalledMods, RegistryStore};
use crate::runtime::{Console, Runtime};

pub struct ListAction<'a, R: Runtime> {
    store: RegistryStore<'a, R>,
}

impl<'a, R: Runtime> ListAction<'a, R> {
    pub fn new(runtime: &'a R, data_dir: &Path) -> Self {
        Self {
            store: RegistryStore::new(runtime, data_dir),
        }
    }

    pub fn list_mods(&self) -> Result<InstalledMods> {
        self.store.load()
    }

    /// Print `[id] name` followed by the indented description, per mod.
    pub fn print<I: BufRead, O: Write>(&self, console: &mut Console<I, O>) -> Result<()> {
        let mods = self.list_mods()?;
        if mods.is_empty() {
            info!("No mods installed");
        }

        for (id, installed) in mods.iter().enumerate() {
            console.say(&format!("[{}] {}", id, installed.name))?;
            console.say(&format!("  {}", installed.description))?;
        }
        Ok(())
    }
}
