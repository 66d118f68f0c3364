//! agentco - command-line console for the AI company simulation.
//!
//! Main entry point for the agentco CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{agents, config, dev, github, keys, project, status, tasks};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// agentco - run a simulated AI company from the terminal
#[derive(Parser)]
#[command(name = "agentco")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend API URL (default: http://localhost:8000/api)
    #[arg(long, global = true, env = "AGENTCO_API_URL")]
    pub server: Option<String>,

    /// Client context to use instead of the current one
    #[arg(long, global = true, env = "AGENTCO_CONTEXT")]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the backend and summarise the current project
    Status(status::StatusArgs),

    /// Manage projects and their requirements survey
    Project(project::ProjectArgs),

    /// Manage agent personas
    Agents(agents::AgentsArgs),

    /// Work with the task board
    Tasks(tasks::TasksArgs),

    /// Start, pause and watch automated development runs
    Dev(dev::DevArgs),

    /// GitHub repository integration
    Github(github::GithubArgs),

    /// Manage AI-provider API keys
    Keys(keys::KeysArgs),

    /// Client configuration and contexts
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "agentco=debug,agentco_client=debug,agentco_domain=debug,agentco_config=debug,info"
    } else {
        "agentco=info,agentco_domain=info,warn"
    };

    let log_dir = agentco_config::log_dir().unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "agentco.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "agentco=trace,agentco_client=trace,agentco_domain=trace,agentco_config=trace,info",
                )),
        )
        .init();

    // Config commands manage the file themselves, so the selected context is
    // only resolved for the others.
    let ctx = || {
        commands::Context::load(
            cli.context.as_deref(),
            cli.server.as_deref(),
            cli.json,
            cli.verbose,
        )
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Status(args) => status::run(args, &ctx()?).await,
        Commands::Project(args) => project::run(args, &ctx()?).await,
        Commands::Agents(args) => agents::run(args, &ctx()?).await,
        Commands::Tasks(args) => tasks::run(args, &ctx()?).await,
        Commands::Dev(args) => dev::run(args, &ctx()?).await,
        Commands::Github(args) => github::run(args, &ctx()?).await,
        Commands::Keys(args) => keys::run(args, &ctx()?).await,
        Commands::Config(args) => config::run(args, cli.json).await,
    }
}
