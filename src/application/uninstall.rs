//! Uninstall use case - removes a mod's files and its registry entry.

use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Result, bail};
use log::debug;

use crate::deploy::FileDeployer;
use crate::error::ModError;
use crate::location::Locations;
use crate::registry::{InstalledMods, RegistryStore};
use crate::runtime::{Console, Runtime};

/// A mod ID, or an inclusive `START-END` range of IDs, as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpec {
    Single(usize),
    Range(usize, usize),
}

impl FromStr for IdSpec {
    type Err = ModError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModError::InvalidIdArgument(s.to_string());
        let number = |text: &str| text.trim().parse::<usize>().map_err(|_| invalid());

        match s.split_once('-') {
            None => Ok(IdSpec::Single(number(s)?)),
            Some((start, end)) => {
                let (start, end) = (number(start)?, number(end)?);
                if start >= end {
                    return Err(invalid());
                }
                Ok(IdSpec::Range(start, end))
            }
        }
    }
}

/// Flatten ID arguments in the order given.
pub fn expand_ids(specs: &[IdSpec]) -> Vec<usize> {
    specs
        .iter()
        .flat_map(|spec| match *spec {
            IdSpec::Single(id) => id..=id,
            IdSpec::Range(start, end) => start..=end,
        })
        .collect()
}

pub struct UninstallAction<'a, R: Runtime> {
    store: RegistryStore<'a, R>,
    deployer: FileDeployer<'a, R>,
}

impl<'a, R: Runtime> UninstallAction<'a, R> {
    pub fn new(runtime: &'a R, locations: &'a Locations, data_dir: &Path) -> Self {
        Self {
            store: RegistryStore::new(runtime, data_dir),
            deployer: FileDeployer::new(runtime, locations),
        }
    }

    /// Uninstall the mods listed at `ids`.
    ///
    /// IDs refer to the registry as it is before anything is removed. All of
    /// them are validated first; an invalid ID leaves the registry untouched.
    #[tracing::instrument(skip(self, console))]
    pub fn uninstall_ids<I: BufRead, O: Write>(
        &self,
        ids: &[usize],
        console: &mut Console<I, O>,
    ) -> Result<()> {
        let snapshot = self.store.load()?;
        let unique_names = resolve_ids(&snapshot, ids)?;

        for unique_name in &unique_names {
            self.uninstall(unique_name, console)?;
        }
        Ok(())
    }

    /// Remove one mod by unique name, with its own registry load/save cycle.
    pub fn uninstall<I: BufRead, O: Write>(
        &self,
        unique_name: &str,
        console: &mut Console<I, O>,
    ) -> Result<()> {
        let mut mods = self.store.load()?;
        let Some((index, installed)) = mods.take(unique_name) else {
            bail!("{} is no longer installed", unique_name);
        };
        debug!("Uninstalling {} from position {}", unique_name, index);

        console.say(&format!("> uninstalling {}", installed.name))?;
        for file in &installed.files {
            console.say(&format!("-> removing {}", file.file_name))?;
            self.deployer.delete(file)?;
        }

        self.store.save(&mods)?;
        console.say(&format!("> successfully uninstalled {}", installed.name))?;
        Ok(())
    }
}

/// Map IDs to unique names, rejecting the batch if any ID is out of range.
/// Repeated IDs are uninstalled once.
fn resolve_ids(mods: &InstalledMods, ids: &[usize]) -> Result<Vec<String>> {
    let mut unique_names: Vec<String> = Vec::with_capacity(ids.len());
    for &id in ids {
        let installed = mods.get(id).ok_or(ModError::InvalidModId {
            id,
            count: mods.len(),
        })?;
        if !unique_names.contains(&installed.unique_name) {
            unique_names.push(installed.unique_name.clone());
        }
    }
    Ok(unique_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{InstallAction, InstallOptions};
    use crate::runtime::RealRuntime;
    use crate::test_utils::{GameDirs, write_sporemod};
    use std::fs;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn install_packages(dirs: &GameDirs, names: &[&str]) {
        let action = InstallAction::new(
            &RealRuntime,
            &dirs.locations,
            &dirs.data_dir,
            InstallOptions::default(),
        );
        for name in names {
            let path = dirs.root().join(format!("{}.package", name));
            fs::write(&path, name).unwrap();
            action.install(&path, &mut console("")).unwrap();
        }
    }

    fn installed_names(dirs: &GameDirs) -> Vec<String> {
        RegistryStore::new(&RealRuntime, &dirs.data_dir)
            .load()
            .unwrap()
            .iter()
            .map(|m| m.unique_name.clone())
            .collect()
    }

    #[test]
    fn test_install_then_uninstall_restores_state() {
        let dirs = GameDirs::new();
        install_packages(&dirs, &["base"]);
        let store = RegistryStore::new(&RealRuntime, &dirs.data_dir);
        let before = store.load().unwrap();

        let path = dirs.root().join("multi.sporemod");
        write_sporemod(
            &path,
            r#"<mod displayName="Multi" unique="Multi">
                <component displayName="Extra" unique="Extra" game="galacticadventures">extra.package</component>
                <prerequisite game="?spore">lib.dll?core.package</prerequisite>
            </mod>"#,
            &[("extra.package", "e"), ("lib.dll", "l"), ("core.package", "c")],
        );
        let install = InstallAction::new(
            &RealRuntime,
            &dirs.locations,
            &dirs.data_dir,
            InstallOptions::default(),
        );
        install.install(&path, &mut console("0\n")).unwrap();
        assert!(dirs.ep1_data().join("extra.package").exists());
        assert!(dirs.mod_libs().join("lib.dll").exists());
        assert!(dirs.core_data().join("core.package").exists());

        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);
        let mut out = console("");
        action.uninstall_ids(&[1], &mut out).unwrap();

        assert_eq!(store.load().unwrap(), before);
        assert!(!dirs.ep1_data().join("extra.package").exists());
        assert!(!dirs.mod_libs().join("lib.dll").exists());
        assert!(!dirs.core_data().join("core.package").exists());
        assert!(dirs.ep1_data().join("base.package").exists());

        let output = String::from_utf8(out.into_output()).unwrap();
        assert!(output.contains("> uninstalling Multi"));
        assert!(output.contains("-> removing lib.dll"));
        assert!(output.contains("> successfully uninstalled Multi"));
    }

    #[test]
    fn test_uninstall_out_of_range_leaves_registry() {
        let dirs = GameDirs::new();
        install_packages(&dirs, &["a", "b"]);

        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);
        let err = action.uninstall_ids(&[2], &mut console("")).unwrap_err();

        match err.downcast_ref::<ModError>() {
            Some(ModError::InvalidModId { id, count }) => {
                assert_eq!(*id, 2);
                assert_eq!(*count, 2);
            }
            other => panic!("Expected InvalidModId, got {:?}", other),
        }
        assert_eq!(installed_names(&dirs), vec!["a", "b"]);
        assert!(dirs.ep1_data().join("b.package").exists());
    }

    #[test]
    fn test_uninstall_from_empty_registry_fails() {
        let dirs = GameDirs::new();
        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);

        let err = action.uninstall_ids(&[0], &mut console("")).unwrap_err();
        assert_eq!(err.to_string(), "invalid mod ID 0: no mods are installed");
    }

    #[test]
    fn test_batch_ids_refer_to_initial_listing() {
        let dirs = GameDirs::new();
        install_packages(&dirs, &["a", "b", "c", "d"]);

        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);
        action.uninstall_ids(&[3, 0, 3], &mut console("")).unwrap();

        assert_eq!(installed_names(&dirs), vec!["b", "c"]);
        assert!(!dirs.ep1_data().join("a.package").exists());
        assert!(!dirs.ep1_data().join("d.package").exists());
    }

    #[test]
    fn test_batch_with_invalid_id_removes_nothing() {
        let dirs = GameDirs::new();
        install_packages(&dirs, &["a", "b"]);

        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);
        assert!(action.uninstall_ids(&[0, 9], &mut console("")).is_err());

        assert_eq!(installed_names(&dirs), vec!["a", "b"]);
    }

    #[test]
    fn test_uninstall_with_file_already_deleted() {
        let dirs = GameDirs::new();
        install_packages(&dirs, &["a"]);
        fs::remove_file(dirs.ep1_data().join("a.package")).unwrap();

        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);
        action.uninstall_ids(&[0], &mut console("")).unwrap();

        assert!(installed_names(&dirs).is_empty());
    }

    #[test]
    fn test_id_spec_parsing() {
        assert_eq!("2".parse::<IdSpec>().unwrap(), IdSpec::Single(2));
        assert_eq!("0-3".parse::<IdSpec>().unwrap(), IdSpec::Range(0, 3));
        assert_eq!(" 1 - 2 ".parse::<IdSpec>().unwrap(), IdSpec::Range(1, 2));

        for input in ["", "x", "3-3", "3-1", "1-", "-1", "1-2-3", "a-b"] {
            assert!(
                matches!(input.parse::<IdSpec>(), Err(ModError::InvalidIdArgument(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_expand_ids_keeps_order() {
        assert_eq!(
            expand_ids(&[IdSpec::Single(5), IdSpec::Range(0, 2), IdSpec::Single(1)]),
            vec![5, 0, 1, 2, 1]
        );
    }

    #[test]
    fn test_uninstall_range() {
        let dirs = GameDirs::new();
        install_packages(&dirs, &["a", "b", "c", "d", "e"]);

        let action = UninstallAction::new(&RealRuntime, &dirs.locations, &dirs.data_dir);
        let ids = expand_ids(&["1-3".parse().unwrap()]);
        action.uninstall_ids(&ids, &mut console("")).unwrap();

        assert_eq!(installed_names(&dirs), vec!["a", "e"]);
    }
}
