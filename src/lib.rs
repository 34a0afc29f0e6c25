pub mod application;
pub mod archive;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod location;
pub mod manifest;
pub mod registry;
pub mod runtime;
pub mod selection;
