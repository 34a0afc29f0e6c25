//! Command entry points called by the CLI.
//!
//! Each command builds a [`config::Config`] (which validates the directory
//! configuration before anything else happens) and drives one use case with a
//! console on stdin/stdout.

pub mod config;
mod install;
mod list;
mod paths;
mod uninstall;

pub use config::{DirectoryOptions, save_paths};
pub use install::install;
pub use list::list;
pub use uninstall::uninstall;
