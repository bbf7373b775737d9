//! Routing table listing

use anyhow::Result;
use console::style;
use studyrouter_core::RouterConfig;

use super::{Cli, load_config};

/// Print the model catalogue, fallback chain and rules of the active table
pub fn handle_models_command(cli: &Cli) -> Result<()> {
    let manager = load_config(cli)?;
    match manager.config_path() {
        Some(path) => println!("{} {}", style("Config:").bold(), path.display()),
        None => println!("{} built-in defaults", style("Config:").bold()),
    }
    println!();
    print_table(&manager.config().router);
    Ok(())
}

fn print_table(router: &RouterConfig) {
    println!("{}", style("Models").bold().underlined());
    for model in router.models.values() {
        let marker = if model.id == router.default_model { "*" } else { " " };
        println!(
            "{} {:<16} {:<36} ${:<8} {:>6} tokens",
            style(marker).green().bold(),
            style(&model.id).cyan(),
            model.model,
            model.cost_per_1k_tokens,
            model.max_tokens
        );
    }
    println!(
        "  {} {} ({})",
        style("classifier").dim(),
        router.classifier.model,
        router.classifier.max_tokens
    );

    println!();
    println!("{}", style("Fallback chain").bold().underlined());
    println!("  {}", router.fallback_chain.join(" -> "));

    println!();
    println!("{}", style("Rules").bold().underlined());
    for (index, rule) in router.rules.iter().enumerate() {
        let condition = rule
            .condition
            .map(|condition| format!(" if {condition}"))
            .unwrap_or_default();
        println!("  {}. {}{} -> {}", index + 1, rule.task, condition, rule.model);
    }
    println!("  otherwise -> {}", router.default_model);
}
