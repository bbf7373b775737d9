use anyhow::{Context, Result};
use console::style;
use studyrouter_core::llm::Message;
use studyrouter_core::{ModelRouter, RouteRequest, TaskType, estimate_complexity};

use super::{Cli, load_config};

/// Options of the route command
#[derive(Debug, Clone)]
pub struct RouteArgs {
    pub task: TaskType,
    pub prompt: String,
    pub system: Option<String>,
    pub complexity: Option<f64>,
    pub estimate: bool,
    pub model_override: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub json: bool,
}

impl RouteArgs {
    fn into_request(self) -> RouteRequest {
        let complexity = if self.estimate {
            Some(estimate_complexity(&self.prompt).score)
        } else {
            self.complexity
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(self.prompt));

        RouteRequest {
            task: self.task,
            messages,
            complexity,
            model_override: self.model_override,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Handle the route command
pub async fn handle_route_command(cli: &Cli, args: RouteArgs) -> Result<()> {
    let manager = load_config(cli)?;
    let router =
        ModelRouter::from_config(manager.config()).context("failed to build model router")?;

    let json = args.json;
    let request = args.into_request();
    let task = request.task;
    let response = router
        .route(request)
        .await
        .with_context(|| format!("routing {task} request failed"))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("failed to serialize response")?
        );
        return Ok(());
    }

    println!("{}", response.content);
    let mut footer = format!(
        "{} via {} ({}), {} tokens",
        task, response.model_id, response.model, response.usage.total_tokens
    );
    if let Some(original) = &response.original_model {
        footer.push_str(&format!(", fell back from {original}"));
    }
    if response.truncated {
        footer.push_str(", truncated at max_tokens");
    }
    eprintln!("{}", style(footer).dim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyrouter_core::llm::MessageRole;

    fn args() -> RouteArgs {
        RouteArgs {
            task: TaskType::Explain,
            prompt: "Explain the derivative of f(x) = x^2".to_string(),
            system: None,
            complexity: None,
            estimate: false,
            model_override: None,
            max_tokens: None,
            temperature: None,
            json: false,
        }
    }

    #[test]
    fn builds_system_and_user_messages() {
        let request = RouteArgs {
            system: Some("You are a tutor.".to_string()),
            ..args()
        }
        .into_request();

        let roles: Vec<MessageRole> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::System, MessageRole::User]);
    }

    #[test]
    fn estimate_fills_complexity() {
        let request = RouteArgs {
            estimate: true,
            ..args()
        }
        .into_request();
        let score = request.complexity.unwrap_or(-1.0);
        assert!((0.0..=1.0).contains(&score));
    }
}
