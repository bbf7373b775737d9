//! Command-line interface module
//!
//! Argument definitions live in [`args`]; each subcommand has its own handler.

pub mod args;
pub mod estimate;
pub mod init;
pub mod models;
pub mod route;
pub mod select;
pub mod validate;

pub use args::{Cli, Commands};
pub use estimate::handle_estimate_command;
pub use init::handle_init_command;
pub use models::handle_models_command;
pub use route::handle_route_command;
pub use select::handle_select_command;
pub use validate::handle_validate_command;

use anyhow::{Context, Result};
use std::path::PathBuf;
use studyrouter_core::ConfigManager;

/// Workspace from `--workspace`, else the current directory
pub fn resolve_workspace(cli: &Cli) -> Result<PathBuf> {
    match &cli.workspace {
        Some(path) => Ok(path.clone()),
        None => std::env::current_dir().context("cannot determine current dir"),
    }
}

/// Load `--config` if given, else search the workspace
pub fn load_config(cli: &Cli) -> Result<ConfigManager> {
    match &cli.config {
        Some(path) => ConfigManager::load_from_file(path),
        None => ConfigManager::load_from_workspace(resolve_workspace(cli)?),
    }
}
