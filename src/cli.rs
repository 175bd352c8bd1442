//! CLI definitions for slactac.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// slactac CLI.
#[derive(Parser)]
#[command(name = "slactac")]
#[command(about = "Rename chat sidebar labels client-side")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage label overrides
    Tack {
        #[command(subcommand)]
        action: TackAction,
    },

    /// Run the engine against a page fixture
    Simulate {
        /// Path to a JSON page fixture
        fixture: PathBuf,

        /// Activate the picker and click at X,Y
        #[arg(long, value_name = "X,Y")]
        pick: Option<String>,
    },

    /// Load and validate the configuration
    CheckConfig,
}

#[derive(Subcommand)]
pub(crate) enum TackAction {
    /// Add or replace an override
    Add {
        /// Label as the chat client shows it
        original: String,

        /// Label to show instead
        replacement: String,
    },

    /// Remove an override
    Remove {
        /// Original label
        original: String,
    },

    /// List all overrides
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Remove every override
    Clear {
        /// Confirm removal
        #[arg(long)]
        yes: bool,
    },

    /// Show the last picked channel name
    Picked {
        /// Forget it after showing
        #[arg(long)]
        clear: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tack_add() {
        let cli = Cli::parse_from(["slactac", "tack", "add", "general", "🔥 general"]);
        match cli.command {
            Commands::Tack {
                action: TackAction::Add {
                    original,
                    replacement,
                },
            } => {
                assert_eq!(original, "general");
                assert_eq!(replacement, "🔥 general");
            }
            _ => panic!("expected tack add"),
        }
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }

    #[test]
    fn test_parse_simulate_with_pick() {
        let cli = Cli::parse_from([
            "slactac",
            "--config",
            "custom.toml",
            "simulate",
            "page.json",
            "--pick",
            "50,45",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert!(matches!(
            cli.command,
            Commands::Simulate { pick: Some(ref p), .. } if p == "50,45"
        ));
    }

    #[test]
    fn test_clear_defaults_to_unconfirmed() {
        let cli = Cli::parse_from(["slactac", "tack", "clear"]);
        assert!(matches!(
            cli.command,
            Commands::Tack {
                action: TackAction::Clear { yes: false }
            }
        ));
    }
}
