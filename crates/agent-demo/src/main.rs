//! agent-demo: drive the search tool and model registry from the shell
//!
//! The agent topologies call these same pieces through the tool registry;
//! this binary is for checking a setup by hand.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "agent-demo")]
#[command(about = "Search tool and model registry for the local agent demos", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to agent.toml (searched for in parent directories by default)
    #[arg(long, global = true, env = "AGENT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a web search through the normalizer
    Search {
        /// The search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Number of results to request
        #[arg(short = 'n', long, default_value_t = 5)]
        num_results: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the model allow-list
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Check the inference endpoint for a model
    Health {
        /// Model to check (defaults to models.selected)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Print tool definitions as sent to the agent runtime
    Tools,

    /// Dispatch a tool call through the registry
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
}

#[derive(Debug, Subcommand)]
enum ModelAction {
    /// List allow-listed models
    List,
    /// Show the connection descriptor for a model
    Show {
        /// Model name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            query,
            num_results,
            json,
        } => commands::search(&config, &query.join(" "), num_results, json).await,
        Commands::Models { action } => match action {
            ModelAction::List => commands::models_list(&config),
            ModelAction::Show { name } => commands::models_show(&config, &name),
        },
        Commands::Health { model } => commands::health(&config, model).await,
        Commands::Tools => commands::tools(&config),
        Commands::Call { name, args } => commands::call(&config, name, &args).await,
    }
}
