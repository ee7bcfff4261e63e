use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sidekick_core::config::api_keys;
use sidekick_core::SidekickConfig;

mod repl;

/// Workspace chat assistant. Ask questions about your code; Sidekick picks
/// the relevant files and streams a Gemini answer.
#[derive(Parser, Debug)]
#[command(name = "sidekick", version, about)]
struct Cli {
    /// Workspace root to collect context from
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// File treated as the currently active editor file
    #[arg(long)]
    active_file: Option<PathBuf>,

    /// Override the answer-generation model
    #[arg(long)]
    answer_model: Option<String>,

    /// Override the classification model
    #[arg(long)]
    classifier_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    api_keys::load_dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let workspace = cli
        .workspace
        .canonicalize()
        .with_context(|| format!("workspace root {} not found", cli.workspace.display()))?;

    let mut config = SidekickConfig::from_env(workspace);
    if let Some(model) = cli.answer_model {
        config.answer_model = model;
    }
    if let Some(model) = cli.classifier_model {
        config.classifier_model = model;
    }

    repl::run(config, cli.active_file).await
}
