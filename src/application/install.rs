//! Install use case - turns a mod file into registered, materialized files.
//!
//! This use case coordinates:
//! - Batch planning (duplicate unique names, `--needed`)
//! - Manifest loading and user selection (`.sporemod`)
//! - File conflict detection against other installed mods
//! - Replacing a previous installation of the same mod in place
//! - Extraction/copy with cleanup of partially written files
//! - Registry persistence

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};

use crate::archive::ZipModArchive;
use crate::deploy::FileDeployer;
use crate::error::ModError;
use crate::location::{InstallLocation, Locations};
use crate::registry::{InstalledMod, InstalledModFile, RegistryStore};
use crate::runtime::{Console, Runtime};
use crate::selection::SelectionEngine;

/// The kinds of mod files that can be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKind {
    /// A zip archive with a `modinfo.xml`.
    SporeMod,
    /// A single data file copied into GalacticAdventuresData.
    Package,
}

impl ModKind {
    pub fn from_path(path: &Path) -> Result<Self, ModError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        match extension.as_deref() {
            Some("sporemod") => Ok(ModKind::SporeMod),
            Some("package") => Ok(ModKind::Package),
            _ => Err(ModError::UnsupportedModType(path.to_path_buf())),
        }
    }
}

/// Check every path of an install batch before anything is installed.
pub fn validate_mod_paths<R: Runtime>(runtime: &R, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        if !runtime.is_file(path) {
            return Err(ModError::ModFileNotFound(path.clone()).into());
        }
        ModKind::from_path(path)?;
    }
    Ok(())
}

/// Options for the install use case
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Skip the warning confirmations
    pub yes: bool,
    /// Print the destination of every file
    pub verbose: bool,
    /// Skip mods that are already installed instead of replacing them
    pub needed: bool,
}

pub struct InstallAction<'a, R: Runtime> {
    runtime: &'a R,
    locations: &'a Locations,
    store: RegistryStore<'a, R>,
    deployer: FileDeployer<'a, R>,
    options: InstallOptions,
}

impl<'a, R: Runtime> InstallAction<'a, R> {
    pub fn new(
        runtime: &'a R,
        locations: &'a Locations,
        data_dir: &Path,
        options: InstallOptions,
    ) -> Self {
        Self {
            runtime,
            locations,
            store: RegistryStore::new(runtime, data_dir),
            deployer: FileDeployer::new(runtime, locations),
            options,
        }
    }

    /// Install a batch of mod files in order and return how many were installed.
    ///
    /// Every file is read up front for its unique name, so a broken archive
    /// stops the batch before anything is installed. A file whose unique name
    /// already appeared earlier in the batch is skipped, and with
    /// [`InstallOptions::needed`] so is every mod that is already installed.
    #[tracing::instrument(skip(self, console))]
    pub fn install_all<I: BufRead, O: Write>(
        &self,
        paths: &[PathBuf],
        console: &mut Console<I, O>,
    ) -> Result<usize> {
        let installed = self.store.load()?;
        let mut planned: Vec<(String, &Path)> = Vec::with_capacity(paths.len());

        for path in paths {
            let unique_name = self.unique_name(path)?;
            if planned.iter().any(|(name, _)| *name == unique_name) {
                console.say(&format!(
                    "Skipping {} as it's already being installed",
                    path.display()
                ))?;
            } else if self.options.needed && installed.position(&unique_name).is_some() {
                console.say(&format!("Skipping {} as it's already installed", path.display()))?;
            } else {
                planned.push((unique_name, path.as_path()));
            }
        }

        for (_, path) in &planned {
            self.install(path, console)?;
        }
        Ok(planned.len())
    }

    /// The unique name the mod at `path` is registered under.
    fn unique_name(&self, path: &Path) -> Result<String> {
        match ModKind::from_path(path)? {
            ModKind::SporeMod => Ok(ZipModArchive::open(self.runtime, path)?
                .read_manifest()?
                .unique_name),
            ModKind::Package => Ok(package_mod(path)?.unique_name),
        }
    }

    /// Install one mod file, with its own registry load/save cycle.
    #[tracing::instrument(skip(self, console))]
    pub fn install<I: BufRead, O: Write>(
        &self,
        path: &Path,
        console: &mut Console<I, O>,
    ) -> Result<()> {
        console.say(&format!("> installing {}", path.display()))?;

        match ModKind::from_path(path)? {
            ModKind::SporeMod => self.install_sporemod(path, console)?,
            ModKind::Package => self.install_package(path, console)?,
        }

        console.say(&format!("> successfully installed {}", path.display()))?;
        Ok(())
    }

    fn install_sporemod<I: BufRead, O: Write>(
        &self,
        path: &Path,
        console: &mut Console<I, O>,
    ) -> Result<()> {
        let mut archive = ZipModArchive::open(self.runtime, path)?;
        let manifest = archive.read_manifest()?;
        debug!(
            "Manifest {} (installer {:?}, dlls {:?})",
            manifest.unique_name,
            manifest.installer_system_version.map(|v| v.to_string()),
            manifest.dlls_build.map(|v| v.to_string())
        );

        if manifest.needs_configuration() {
            console.say(&format!("-> configuring {}", manifest.display_name))?;
        }
        let engine = SelectionEngine::new(self.runtime, self.locations, self.options.yes);
        let installed: InstalledMod = engine.resolve(&manifest, console)?.into();

        if let Some(missing) = installed.files.iter().find(|f| !archive.contains(&f.file_name)) {
            return Err(ModError::MissingArchiveFile(missing.file_name.clone()).into());
        }

        self.reconcile(installed, console, |file| {
            self.deployer.install_from_archive(&mut archive, file)
        })
    }

    fn install_package<I: BufRead, O: Write>(
        &self,
        path: &Path,
        console: &mut Console<I, O>,
    ) -> Result<()> {
        let installed = package_mod(path)?;
        for file in &installed.files {
            if self.deployer.is_in_place(path, file)? {
                return Err(ModError::SourceIsDestination(path.to_path_buf()).into());
            }
        }
        self.reconcile(installed, console, |file| {
            self.deployer.install_from_path(path, file)
        })
    }

    /// Put `installed` into the registry and write its files.
    ///
    /// A previous installation with the same unique name has its files deleted
    /// first and is replaced at the same position. When writing fails, the
    /// files written so far are removed and the registry is saved without the
    /// previous installation, whose files are already gone.
    fn reconcile<I: BufRead, O: Write>(
        &self,
        installed: InstalledMod,
        console: &mut Console<I, O>,
        mut write_file: impl FnMut(&InstalledModFile) -> Result<()>,
    ) -> Result<()> {
        let mut mods = self.store.load()?;

        for file in &installed.files {
            if let Some(owner) = mods.owner_of(file, &installed.unique_name) {
                return Err(ModError::FileConflict {
                    owner: owner.name.clone(),
                    file_name: file.file_name.clone(),
                }
                .into());
            }
        }

        let previous = mods.take(&installed.unique_name);
        if let Some((index, old)) = &previous {
            info!("Replacing {} at position {}", old.unique_name, index);
            console.say(&format!("-> removing previous version of {}", old.name))?;
            for file in &old.files {
                debug!("Removing {}", file.file_name);
                self.deployer.delete(file)?;
            }
        }

        let mut written: Vec<InstalledModFile> = Vec::with_capacity(installed.files.len());
        for file in &installed.files {
            console.say(&format!("-> installing {}", file.file_name))?;
            if self.options.verbose {
                console.say(&format!(
                    "--> installing {} to {}",
                    file.file_name,
                    self.deployer.destination(file).display()
                ))?;
            }

            if let Err(e) = write_file(file) {
                self.deployer.remove_partial(&written);
                if previous.is_some() {
                    self.store.save(&mods)?;
                }
                return Err(e);
            }
            written.push(file.clone());
        }

        match previous {
            Some((index, _)) => mods.insert(index, installed),
            None => mods.push(installed),
        }
        self.store.save(&mods)
    }
}

/// Registry entry for a raw `.package` file: named after the file stem,
/// installed into GalacticAdventuresData.
fn package_mod(path: &Path) -> Result<InstalledMod> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ModError::UnsupportedModType(path.to_path_buf()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(InstalledMod {
        name: stem.clone(),
        unique_name: stem,
        description: String::new(),
        files: vec![InstalledModFile {
            file_name,
            install_location: InstallLocation::GalacticAdventuresData,
        }],
    })
}
