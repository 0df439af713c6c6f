use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "fable")]
#[command(about = "Fable - write the next line of someone else's story", long_about = None)]
struct Cli {
    /// Story service origin, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    server: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Play against a local in-memory engine instead of the server
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a username and remember it on this device
    Login {
        /// Your username; a leading @ is fine
        name: String,
    },
    /// Forget the remembered user
    Logout,
    /// Show the remembered user
    Whoami,
    /// Write lines until you quit
    Play,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = commands::load_config(cli.config.clone());
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    let interactive = matches!(cli.command, Commands::Play);
    let _log_guard = logging::init(&config.logging, interactive);

    let app = commands::AppContext::new(config, cli.offline)?;
    match cli.command {
        Commands::Login { name } => commands::auth::login(&app, &name).await?,
        Commands::Logout => commands::auth::logout(&app).await?,
        Commands::Whoami => commands::auth::whoami(&app).await?,
        Commands::Play => commands::play::run(&app).await?,
    }

    Ok(())
}
