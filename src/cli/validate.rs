use anyhow::Result;
use console::style;
use studyrouter_core::config::get_api_key;

use super::{Cli, load_config};

/// Handle the validate command
///
/// Loading already rejects malformed tables; a missing credential is only a warning.
pub fn handle_validate_command(cli: &Cli) -> Result<()> {
    let manager = load_config(cli)?;
    let config = manager.config();
    config.validate()?;

    match manager.config_path() {
        Some(path) => println!("{} {}", style("Valid:").green().bold(), path.display()),
        None => println!(
            "{} no studyrouter.toml found, built-in defaults are valid",
            style("Valid:").green().bold()
        ),
    }
    println!(
        "  {} models, {} rules, fallback chain of {}",
        config.router.models.len(),
        config.router.rules.len(),
        config.router.fallback_chain.len()
    );

    if let Err(e) = get_api_key(&config.api.key_sources()) {
        println!("{} {e}", style("Warning:").yellow().bold());
    }
    Ok(())
}
