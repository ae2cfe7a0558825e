// ABOUTME: Entry point for the webroll CLI application.
// ABOUTME: Parses arguments, sets up logging and dispatches to command handlers.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::path::Path;
use webroll::config::{self, Config};
use webroll::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Deploy { source: None });

    if let Commands::Init { port, force } = command {
        logging::init(cli.verbose, None);
        let cwd = env::current_dir()?;
        let path = config::init_config(&cwd, port, force)?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    logging::init(cli.verbose, Some(&config.deploy.log_file));

    match command {
        Commands::Deploy { source } => commands::deploy(config, source).await,
        Commands::Rollback { snapshot } => commands::rollback(config, snapshot.as_deref()),
        Commands::Snapshots => commands::list_snapshots(&config),
        Commands::Links { root, fix } => {
            let root = root.unwrap_or_else(|| config.server.root_dir.clone());
            let backup_name = config
                .deploy
                .backup_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            let skip: Vec<&str> = backup_name.as_deref().into_iter().collect();
            commands::links(&root, fix, &skip)
        }
        Commands::Init { .. } => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}
