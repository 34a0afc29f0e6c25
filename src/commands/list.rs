use anyhow::Result;
use std::io::{BufRead, Write};

use crate::application::ListAction;
use crate::runtime::{Console, Runtime};

use super::config::{Config, DirectoryOptions};

/// List all installed mods
#[tracing::instrument(skip(runtime, directories))]
pub fn list<R: Runtime>(runtime: R, directories: DirectoryOptions) -> Result<()> {
    let config = Config::new(runtime, directories)?;
    run(&config, &mut Console::stdio())
}

pub(crate) fn run<R: Runtime, I: BufRead, O: Write>(
    config: &Config<R>,
    console: &mut Console<I, O>,
) -> Result<()> {
    ListAction::new(&config.runtime, &config.data_dir).print(console)
}
