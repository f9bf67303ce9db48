//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envwiz")]
#[command(about = "Interactive .env file editor with schema validation")]
#[command(version)]
#[command(author)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Env file to read and write (default from config, usually .env)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Schema file describing the fields (default from config, usually envwiz.toml)
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Open the envwiz config file in $EDITOR
    #[arg(long)]
    pub config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prompt for every field in the schema (default)
    #[command(visible_alias = "p")]
    Prompt,

    /// Print the values of one or more variables
    Get {
        /// Variable names
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set variables without prompting
    Set {
        /// KEY=VALUE pairs
        #[arg(required = true)]
        assignments: Vec<String>,

        /// What to do when a variable already has a different value
        #[arg(long, default_value = "ask")]
        on_conflict: ConflictStrategy,
    },

    /// List every variable in the env file
    #[command(visible_alias = "ls")]
    List,

    /// Backup management
    Backup {
        #[command(subcommand)]
        backup_command: BackupCommands,
    },
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// List backups of the env file
    List,
    /// Restore a backup over the env file
    Restore {
        /// Backup ID, or a unique part of it
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove old backups
    Clean {
        /// Number of backups to keep
        #[arg(long, default_value = "20")]
        keep: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ConflictStrategy {
    #[default]
    Ask,
    Skip,
    Overwrite,
}
