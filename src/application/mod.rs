//! Application layer - Use cases that coordinate domain services.
//!
//! This layer sits between the CLI commands and the registry, selection and
//! deployment services.

mod install;
mod list;
mod uninstall;

pub use install::{InstallAction, InstallOptions, ModKind, validate_mod_paths};
pub use list::ListAction;
pub use uninstall::{IdSpec, UninstallAction, expand_ids};
