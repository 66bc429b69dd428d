mod fetch;
mod jar;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::jar::JarCommands;

#[derive(Debug, Parser)]
#[command(name = "lotprobe")]
#[command(about = "Resolve Copart and IAAI listing URLs into vehicle records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one listing and print the outcome as JSON
    Fetch {
        /// Copart lot URL or IAAI vehicle detail URL
        url: String,

        /// Pretty-print the JSON outcome
        #[arg(long)]
        pretty: bool,
    },
    /// Inspect or reset the per-site cookie jars
    Jar {
        #[command(subcommand)]
        command: JarCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = lotprobe_core::load_app_config()?;

    // stdout carries only the outcome JSON
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fetch { url, pretty } => fetch::run(&config, &url, pretty).await?,
        Commands::Jar { command } => jar::run(&config, &command),
    }

    Ok(())
}
