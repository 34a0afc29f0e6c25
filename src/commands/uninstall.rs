use anyhow::Result;
use std::io::{BufRead, Write};

use crate::application::{IdSpec, UninstallAction, expand_ids};
use crate::runtime::{Console, Runtime};

use super::config::{Config, DirectoryOptions};

/// Uninstall mods by the IDs (or ID ranges) shown by `--list-installed`
#[tracing::instrument(skip(runtime, directories))]
pub fn uninstall<R: Runtime>(
    runtime: R,
    ids: &[IdSpec],
    directories: DirectoryOptions,
) -> Result<()> {
    let config = Config::new(runtime, directories)?;
    run(&config, &expand_ids(ids), &mut Console::stdio())
}

pub(crate) fn run<R: Runtime, I: BufRead, O: Write>(
    config: &Config<R>,
    ids: &[usize],
    console: &mut Console<I, O>,
) -> Result<()> {
    UninstallAction::new(&config.runtime, &config.locations, &config.data_dir)
        .uninstall_ids(ids, console)
}
