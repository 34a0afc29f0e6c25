use anyhow::Result;
use log::{debug, info};
use std::path::PathBuf;

use crate::config::{DirectoryConfig, PathOverrides};
use crate::location::Locations;
use crate::runtime::Runtime;

use super::paths::default_data_dir;

/// Where the data directory is and how the install roots may be overridden.
#[derive(Debug, Clone, Default)]
pub struct DirectoryOptions {
    pub data_dir: Option<PathBuf>,
    pub overrides: PathOverrides,
    /// Persist `overrides` into the directory configuration
    pub save_paths: bool,
}

/// Everything a command needs: the runtime, the data directory and the
/// validated install locations.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub data_dir: PathBuf,
    pub locations: Locations,
}

impl<R: Runtime> Config<R> {
    /// Resolve the data directory and load the directory configuration.
    ///
    /// Overrides replace the configured roots for this run, and are written
    /// back only once every root has been validated. Fails with
    /// `DirectoryNotFound` when a root is missing.
    pub fn new(runtime: R, options: DirectoryOptions) -> Result<Self> {
        let data_dir = match options.data_dir {
            Some(path) => runtime.absolute(&path)?,
            None => default_data_dir(&runtime)?,
        };
        debug!("Using data directory {:?}", data_dir);

        let overrides = options.overrides.absolute(&runtime)?;
        let mut directories = DirectoryConfig::load_or_create(&runtime, &data_dir)?;
        directories.apply(&overrides);
        let locations = directories.resolve(&runtime, &data_dir)?;

        if options.save_paths {
            info!("Saving directory config to {:?}", data_dir);
            directories.save(&runtime, &data_dir)?;
        }

        Ok(Self {
            runtime,
            data_dir,
            locations,
        })
    }
}

/// Validate and persist path overrides without running a command.
#[tracing::instrument(skip(runtime))]
pub fn save_paths<R: Runtime>(runtime: R, options: DirectoryOptions) -> Result<()> {
    Config::new(
        runtime,
        DirectoryOptions {
            save_paths: true,
            ..options
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::error::ModError;
    use crate::location::InstallLocation;
    use crate::runtime::RealRuntime;
    use crate::test_utils::GameDirs;
    use std::fs;

    fn in_dir(data_dir: PathBuf) -> DirectoryOptions {
        DirectoryOptions {
            data_dir: Some(data_dir),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_with_explicit_data_dir() {
        let dirs = GameDirs::new();
        let config = Config::new(RealRuntime, in_dir(dirs.data_dir.clone())).unwrap();

        assert_eq!(config.data_dir, dirs.data_dir);
        assert_eq!(config.locations, dirs.locations);
        assert_eq!(
            config.locations.resolve(InstallLocation::CoreSporeData),
            dirs.core_data().as_path()
        );
    }

    #[test]
    fn test_config_missing_game_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::new(RealRuntime, in_dir(dir.path().to_path_buf()))
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<ModError>(),
            Some(ModError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_override_applies_to_this_run_only() {
        let dirs = GameDirs::new();
        let custom = dirs.root().join("CustomModLibs");
        fs::create_dir(&custom).unwrap();
        let before = fs::read_to_string(dirs.data_dir.join(CONFIG_FILE_NAME)).unwrap();

        let mut options = in_dir(dirs.data_dir.clone());
        options.overrides.mod_libs = Some(custom.clone());
        let config = Config::new(RealRuntime, options).unwrap();

        assert_eq!(config.locations.resolve(InstallLocation::ModLibs), custom.as_path());
        assert_eq!(
            config.locations.resolve(InstallLocation::CoreSporeData),
            dirs.core_data().as_path()
        );
        let after = fs::read_to_string(dirs.data_dir.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_save_paths_persists_overrides() {
        let dirs = GameDirs::new();
        let custom = dirs.root().join("CustomData");
        fs::create_dir(&custom).unwrap();

        let mut options = in_dir(dirs.data_dir.clone());
        options.overrides.core_spore_data = Some(custom.clone());
        save_paths(RealRuntime, options).unwrap();

        let config = Config::new(RealRuntime, in_dir(dirs.data_dir.clone())).unwrap();
        assert_eq!(
            config.locations.resolve(InstallLocation::CoreSporeData),
            custom.as_path()
        );
    }

    #[test]
    fn test_invalid_override_is_not_saved() {
        let dirs = GameDirs::new();
        let before = fs::read_to_string(dirs.data_dir.join(CONFIG_FILE_NAME)).unwrap();

        let mut options = in_dir(dirs.data_dir.clone());
        options.overrides.galactic_adventures_data = Some(dirs.root().join("missing"));
        let err = save_paths(RealRuntime, options).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ModError>(),
            Some(ModError::DirectoryNotFound(p)) if p.ends_with("missing")
        ));
        let after = fs::read_to_string(dirs.data_dir.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(before, after);
    }
}
