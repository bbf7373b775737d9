use anyhow::{Result, anyhow};
use console::style;
use studyrouter_core::TaskType;

use super::{Cli, load_config};

/// Handle the select command: resolve a model without calling it
pub fn handle_select_command(
    cli: &Cli,
    task: TaskType,
    complexity: Option<f64>,
    model_override: Option<&str>,
) -> Result<()> {
    let manager = load_config(cli)?;
    let router = &manager.config().router;

    let (model, reason) = match model_override {
        Some(id) => {
            let model = router
                .get_model_config(id)
                .ok_or_else(|| anyhow!("Unknown model override: {id}"))?;
            (model, "override".to_string())
        }
        None => {
            let model = router
                .get_model_for_task(task, complexity)
                .ok_or_else(|| anyhow!("routing table has no model for task {task}"))?;
            let reason = match router.rule_for_task(task, complexity) {
                Some(rule) => match rule.condition {
                    Some(condition) => format!("rule {task} if {condition}"),
                    None => format!("rule {task}"),
                },
                None => "default model".to_string(),
            };
            (model, reason)
        }
    };

    println!("{} {}", style("Task:").bold(), task);
    if let Some(score) = complexity {
        println!("{} {score:.2}", style("Complexity:").bold());
    }
    println!(
        "{} {} ({})",
        style("Model:").bold(),
        style(&model.id).cyan().bold(),
        model.model
    );
    println!("{} {}", style("Matched:").bold(), reason);
    println!(
        "{} ${}/1k tokens, max {} tokens",
        style("Budget:").bold(),
        model.cost_per_1k_tokens,
        model.max_tokens
    );
    Ok(())
}
