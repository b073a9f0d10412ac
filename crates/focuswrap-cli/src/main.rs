use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use focuswrap_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focuswrap", version, about = "FocusWrap study session CLI")]
struct Cli {
    /// Config file path (default: ~/.config/focuswrap/config.toml)
    #[arg(long, global = true, env = "FOCUSWRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate or validate study plans
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Run an interactive study session
    Run(commands::run::RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Plan { action } => match load_config(cli.config.as_deref()) {
            Ok(config) => commands::plan::run(action, &config).await,
            Err(e) => Err(e),
        },
        Commands::Run(args) => match load_config(cli.config.as_deref()) {
            Ok(config) => commands::run::run(args, &config).await,
            Err(e) => Err(e),
        },
        Commands::Config { action } => commands::config::run(action, cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}
