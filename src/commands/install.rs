use anyhow::Result;
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::application::{InstallAction, InstallOptions, validate_mod_paths};
use crate::runtime::{Console, Runtime};

use super::config::{Config, DirectoryOptions};

/// Install the given mod files in order
#[tracing::instrument(skip(runtime, directories))]
pub fn install<R: Runtime>(
    runtime: R,
    paths: &[PathBuf],
    directories: DirectoryOptions,
    options: InstallOptions,
) -> Result<()> {
    let config = Config::new(runtime, directories)?;
    run(&config, paths, options, &mut Console::stdio())
}

/// Every path is checked before the first install. Each mod then gets its own
/// registry cycle, and the first failure stops the batch with earlier mods
/// left installed.
pub(crate) fn run<R: Runtime, I: BufRead, O: Write>(
    config: &Config<R>,
    paths: &[PathBuf],
    options: InstallOptions,
    console: &mut Console<I, O>,
) -> Result<()> {
    validate_mod_paths(&config.runtime, paths)?;

    let action = InstallAction::new(
        &config.runtime,
        &config.locations,
        &config.data_dir,
        options,
    );
    let count = action.install_all(paths, console)?;

    info!("Installed {} mod(s)", count);
    Ok(())
}
