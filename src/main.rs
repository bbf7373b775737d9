//! studyrouter CLI entry point

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::route::RouteArgs;
use cli::{Cli, Commands};
use studyrouter_core::config::load_dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level);
    load_dotenv()?;

    match &args.command {
        Commands::Estimate {
            text,
            file,
            classifier,
            json,
        } => cli::handle_estimate_command(&args, text, file.as_deref(), *classifier, *json).await,
        Commands::Select {
            task,
            complexity,
            model_override,
        } => cli::handle_select_command(&args, *task, *complexity, model_override.as_deref()),
        Commands::Route {
            task,
            prompt,
            system,
            complexity,
            estimate,
            model_override,
            max_tokens,
            temperature,
            json,
        } => {
            let route_args = RouteArgs {
                task: *task,
                prompt: prompt.join(" "),
                system: system.clone(),
                complexity: *complexity,
                estimate: *estimate,
                model_override: model_override.clone(),
                max_tokens: *max_tokens,
                temperature: *temperature,
                json: *json,
            };
            cli::handle_route_command(&args, route_args).await
        }
        Commands::Models => cli::handle_models_command(&args),
        Commands::Init { force, home } => {
            let workspace = cli::resolve_workspace(&args)?;
            cli::handle_init_command(&workspace, *force, *home)
        }
        Commands::Validate => cli::handle_validate_command(&args),
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `--log-level`
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
