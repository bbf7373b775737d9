use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use studyrouter_core::StudyRouterConfig;

/// Handle the init command
pub fn handle_init_command(workspace: &Path, force: bool, home: bool) -> Result<()> {
    println!("{}", style("Initialize studyrouter configuration").blue().bold());
    println!("Workspace: {}", workspace.display());

    let created = StudyRouterConfig::bootstrap_project_with_options(workspace, force, home)
        .context("failed to initialize configuration files")?;

    if created.is_empty() {
        println!(
            "{} studyrouter.toml already exists (use --force to overwrite)",
            style("Skipped:").yellow()
        );
    } else {
        for file in created {
            println!("{} {file}", style("Created:").green());
        }
    }
    Ok(())
}
