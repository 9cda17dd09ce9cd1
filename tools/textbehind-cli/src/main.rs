//! textbehind CLI: put a caption behind the subject of a photo.
//!
//! Usage:
//!   textbehind render <INPUT> --text <TEXT>   Composite text behind the subject
//!   textbehind presets                        List the sample presets
//!   textbehind check                          Report fonts and extractor status
//!   textbehind provision [--install]          Make sure the bundled font is present
//!   textbehind init-config                    Write the default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use textbehind_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "textbehind",
    about = "Place text behind the subject of a photo",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/textbehind/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite a caption behind the foreground subject
    Render(commands::render::RenderArgs),

    /// List the built-in sample presets
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check font tiers and extractor availability
    Check,

    /// Make sure the bundled font is available
    Provision {
        /// Run the configured install command if the font is missing
        #[arg(long)]
        install: bool,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    textbehind_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Render(args) => commands::render::run(args, &config),
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Check => commands::check::run(&config),
        Commands::Provision { install } => commands::provision::run(&config, install),
        Commands::InitConfig { force } => commands::init_config::run(cli.config, force),
    }
}
