//! Writing mod files into the install locations and removing them again.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::archive::ZipModArchive;
use crate::location::Locations;
use crate::registry::InstalledModFile;
use crate::runtime::Runtime;

pub struct FileDeployer<'a, R: Runtime> {
    runtime: &'a R,
    locations: &'a Locations,
}

impl<'a, R: Runtime> FileDeployer<'a, R> {
    pub fn new(runtime: &'a R, locations: &'a Locations) -> Self {
        Self { runtime, locations }
    }

    pub fn destination(&self, file: &InstalledModFile) -> PathBuf {
        self.locations
            .file_path(file.install_location, &file.file_name)
    }

    /// Extract `file` from the archive into its install location.
    pub fn install_from_archive(
        &self,
        archive: &mut ZipModArchive,
        file: &InstalledModFile,
    ) -> Result<()> {
        let dest = self.destination(file);
        archive.extract_file(self.runtime, &file.file_name, &dest)
    }

    /// Whether `source` is the very file `file` would be installed to.
    pub fn is_in_place(&self, source: &Path, file: &InstalledModFile) -> Result<bool> {
        let dest = self.destination(file);
        if !self.runtime.exists(&dest) {
            return Ok(false);
        }
        Ok(self.runtime.canonicalize(source)? == self.runtime.canonicalize(&dest)?)
    }

    /// Copy a loose file (a raw `.package`) into the install location of `file`.
    #[tracing::instrument(skip(self))]
    pub fn install_from_path(&self, source: &Path, file: &InstalledModFile) -> Result<()> {
        let dest = self.destination(file);
        self.runtime
            .copy(source, &dest)
            .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;
        debug!("Copied {:?} to {:?}", source, dest);
        Ok(())
    }

    /// Delete an installed file. A file that is already gone is not an error.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, file: &InstalledModFile) -> Result<()> {
        let path = self.destination(file);
        if !self.runtime.exists(&path) {
            debug!("{:?} is already gone, skipping", path);
            return Ok(());
        }
        self.runtime
            .remove_file(&path)
            .with_context(|| format!("Failed to remove {:?}", path))
    }

    /// Best-effort removal of files written by an install that failed halfway.
    pub fn remove_partial(&self, files: &[InstalledModFile]) {
        for file in files {
            if let Err(e) = self.delete(file) {
                warn!("Failed to clean up {}: {:#}", file.file_name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::InstallLocation;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::tempdir;

    fn file(name: &str, location: InstallLocation) -> InstalledModFile {
        InstalledModFile {
            file_name: name.to_string(),
            install_location: location,
        }
    }

    fn locations() -> Locations {
        Locations::new(
            PathBuf::from("/spore/ModLibs"),
            PathBuf::from("/spore/DataEP1"),
            PathBuf::from("/spore/Data"),
        )
    }

    #[test]
    fn test_destination_uses_location() {
        let runtime = MockRuntime::new();
        let locations = locations();
        let deployer = FileDeployer::new(&runtime, &locations);

        assert_eq!(
            deployer.destination(&file("a.dll", InstallLocation::ModLibs)),
            PathBuf::from("/spore/ModLibs/a.dll")
        );
        assert_eq!(
            deployer.destination(&file("b.package", InstallLocation::CoreSporeData)),
            PathBuf::from("/spore/Data/b.package")
        );
    }

    #[test]
    fn test_delete_existing_file() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/spore/DataEP1/mod.package");
        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| true);
        runtime
            .expect_remove_file()
            .with(eq(path))
            .times(1)
            .returning(|_| Ok(()));

        let locations = locations();
        let deployer = FileDeployer::new(&runtime, &locations);
        deployer
            .delete(&file("mod.package", InstallLocation::GalacticAdventuresData))
            .unwrap();
    }

    #[test]
    fn test_delete_missing_file_is_ignored() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_remove_file().never();

        let locations = locations();
        let deployer = FileDeployer::new(&runtime, &locations);
        deployer
            .delete(&file("gone.dll", InstallLocation::ModLibs))
            .unwrap();
    }

    #[test]
    fn test_delete_failure_propagates() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_remove_file()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));

        let locations = locations();
        let deployer = FileDeployer::new(&runtime, &locations);
        let err = deployer
            .delete(&file("locked.dll", InstallLocation::ModLibs))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to remove"));
    }

    #[test]
    fn test_remove_partial_continues_after_failure() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_remove_file()
            .with(eq(PathBuf::from("/spore/ModLibs/a.dll")))
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("busy")));
        runtime
            .expect_remove_file()
            .with(eq(PathBuf::from("/spore/ModLibs/b.dll")))
            .times(1)
            .returning(|_| Ok(()));

        let locations = locations();
        let deployer = FileDeployer::new(&runtime, &locations);
        deployer.remove_partial(&[
            file("a.dll", InstallLocation::ModLibs),
            file("b.dll", InstallLocation::ModLibs),
        ]);
    }

    #[test]
    fn test_install_from_path_copies_verbatim() -> Result<()> {
        let dir = tempdir()?;
        let ep1 = dir.path().join("DataEP1");
        fs::create_dir(&ep1)?;
        let source = dir.path().join("foo.package");
        fs::write(&source, b"\x00\x01package bytes")?;

        let locations = Locations::new(
            dir.path().to_path_buf(),
            ep1.clone(),
            dir.path().to_path_buf(),
        );
        let deployer = FileDeployer::new(&RealRuntime, &locations);
        deployer.install_from_path(
            &source,
            &file("foo.package", InstallLocation::GalacticAdventuresData),
        )?;

        assert_eq!(fs::read(ep1.join("foo.package"))?, b"\x00\x01package bytes");
        Ok(())
    }

    #[test]
    fn test_is_in_place() -> Result<()> {
        let dir = tempdir()?;
        let ep1 = dir.path().join("DataEP1");
        fs::create_dir(&ep1)?;
        fs::write(ep1.join("foo.package"), "installed")?;
        fs::write(dir.path().join("foo.package"), "elsewhere")?;

        let locations = Locations::new(
            dir.path().to_path_buf(),
            ep1.clone(),
            dir.path().to_path_buf(),
        );
        let deployer = FileDeployer::new(&RealRuntime, &locations);
        let target = file("foo.package", InstallLocation::GalacticAdventuresData);

        assert!(deployer.is_in_place(&ep1.join("foo.package"), &target)?);
        let dotted = ep1.join("..").join("DataEP1").join("foo.package");
        assert!(deployer.is_in_place(&dotted, &target)?);
        assert!(!deployer.is_in_place(&dir.path().join("foo.package"), &target)?);
        assert!(!deployer.is_in_place(
            &dir.path().join("foo.package"),
            &file("bar.package", InstallLocation::GalacticAdventuresData)
        )?);
        Ok(())
    }
}
