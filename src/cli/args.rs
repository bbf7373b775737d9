//! CLI argument parsing

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use studyrouter_core::TaskType;

/// Main CLI structure for studyrouter
#[derive(Parser, Debug)]
#[command(
    name = "studyrouter",
    version,
    about = "Complexity-aware model routing for study content generation\n\nQuick Start:\n  export OPENROUTER_API_KEY=\"your_key\"\n  studyrouter estimate \"Explain eigenvalues\"\n  studyrouter route flashcard \"Photosynthesis basics\""
)]
pub struct Cli {
    /// Explicit path to a studyrouter.toml; skips the workspace search
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Workspace searched for studyrouter.toml (default: current directory)
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub workspace: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the complexity of a text
    Estimate {
        /// Text to score; read from --file or stdin when omitted
        text: Vec<String>,

        /// Read the text from a file
        #[arg(long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Ask the classifier model instead of the local heuristic
        #[arg(long)]
        classifier: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which model a task would be routed to, without calling it
    Select {
        /// Task type: flashcard, quiz, summary, notes, explain, classify, chat
        task: TaskType,

        /// Complexity score in [0, 1] for conditional rules
        #[arg(long)]
        complexity: Option<f64>,

        /// Routing-table model id that bypasses the rules
        #[arg(long = "model")]
        model_override: Option<String>,
    },

    /// Route a prompt to the selected model and print the completion
    Route {
        /// Task type: flashcard, quiz, summary, notes, explain, classify, chat
        task: TaskType,

        /// User prompt
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Optional system prompt
        #[arg(long)]
        system: Option<String>,

        /// Complexity score in [0, 1] for conditional rules
        #[arg(long, conflicts_with = "estimate")]
        complexity: Option<f64>,

        /// Estimate the prompt's complexity locally before routing
        #[arg(long)]
        estimate: bool,

        /// Routing-table model id that bypasses the rules and disables fallback
        #[arg(long = "model")]
        model_override: Option<String>,

        /// Completion budget, capped at the model's max_tokens
        #[arg(long)]
        max_tokens: Option<u32>,

        #[arg(long)]
        temperature: Option<f32>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the model catalogue, fallback chain and routing rules
    Models,

    /// Write a default studyrouter.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Write to ~/.studyrouter/ instead of the workspace
        #[arg(long)]
        home: bool,
    },

    /// Load and validate the configuration
    Validate,
}
