// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "webroll")]
#[command(about = "Publish a static site with snapshot, health check and automatic rollback")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (default: discover in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Back up, publish, serve and verify; roll back on failure (default)
    Deploy {
        /// Directory to publish from (overrides deploy.source_dir)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Restore a snapshot into the content root without serving
    Rollback {
        /// Snapshot name, e.g. backup_20240101_120000 (default: the newest)
        #[arg(short, long)]
        snapshot: Option<String>,
    },

    /// List snapshots, oldest first
    Snapshots,

    /// Write a template deploy_config.json
    Init {
        /// Port for the template (default: 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Scan for broken local links
    Links {
        /// Directory to scan (default: the configured content root)
        root: Option<PathBuf>,

        /// Rewrite case mismatches instead of only reporting them
        #[arg(long)]
        fix: bool,
    },
}
