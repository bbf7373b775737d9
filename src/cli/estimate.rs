use anyhow::{Context, Result, bail};
use console::style;
use std::io::Read;
use std::path::Path;
use studyrouter_core::{ComplexityLevel, ComplexityResult, ModelRouter, estimate_complexity};

use super::{Cli, load_config};

/// Handle the estimate command
pub async fn handle_estimate_command(
    cli: &Cli,
    text: &[String],
    file: Option<&Path>,
    classifier: bool,
    json: bool,
) -> Result<()> {
    let input = read_input(text, file)?;

    let result = if classifier {
        let config = load_config(cli)?;
        let router = ModelRouter::from_config(config.config())
            .context("failed to build router for classification")?;
        router.classify_complexity(&input).await
    } else {
        estimate_complexity(&input)
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to serialize result")?
        );
    } else {
        print_result(&result);
    }
    Ok(())
}

fn read_input(text: &[String], file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        if !text.is_empty() {
            bail!("pass either TEXT or --file, not both");
        }
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    if !text.is_empty() {
        return Ok(text.join(" "));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read text from stdin")?;
    Ok(buffer)
}

fn print_result(result: &ComplexityResult) {
    let level = match result.level {
        ComplexityLevel::Simple => style(result.level.to_string()).green(),
        ComplexityLevel::Moderate => style(result.level.to_string()).yellow(),
        ComplexityLevel::Complex => style(result.level.to_string()).red(),
    };
    println!("{} {:.2} ({})", style("Complexity:").bold(), result.score, level.bold());
    for reason in &result.reasoning {
        println!("  {} {reason}", style("-").dim());
    }
}
