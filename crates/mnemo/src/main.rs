// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mnemo - a real-time chat server with semantic memory.
//!
//! This is the binary entry point for the Mnemo server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;

/// Mnemo - a real-time chat server with semantic memory.
#[derive(Parser, Debug)]
#[command(name = "mnemo", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (overrides the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Mnemo chat server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => mnemo_config::load_config_from_path(path),
        None => mnemo_config::load_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(error) => {
            eprintln!("mnemo: configuration error: {error}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(error) = serve::run_serve(config).await {
                eprintln!("mnemo serve: {error}");
                std::process::exit(1);
            }
        }
        None => {
            println!("mnemo: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        super::Cli::command().debug_assert();
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = mnemo_config::load_config_from_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "mnemo");
    }
}
