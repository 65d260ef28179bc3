use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{RunOptions, list_command, run_command, schema_command};

#[derive(Parser, Debug)]
#[command(name = "pulumi-actions")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a registered action with a JSON input document
    #[command(visible_alias = "r")]
    Run {
        /// Action id, e.g. pulumi:up
        action: String,

        /// Input JSON file, or - for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Workspace directory the action runs in (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Log the Pulumi commands without executing them
        #[arg(short, long)]
        dry_run: bool,

        /// Settings file (defaults to the nearest .pulumi-actions.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pulumi binary to invoke
        #[arg(long)]
        pulumi: Option<String>,

        /// Do not echo the Pulumi CLI's own output
        #[arg(short, long)]
        quiet: bool,
    },
    /// List registered actions
    #[command(visible_alias = "ls")]
    List {
        /// Show each action's input fields
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the input schema of an action
    Schema {
        /// Action id
        action: String,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Run {
                action,
                input,
                workspace,
                dry_run,
                config,
                pulumi,
                quiet,
            } => run_command(RunOptions {
                action,
                input,
                workspace,
                dry_run,
                config,
                pulumi,
                quiet,
            }),
            Commands::List { verbose } => list_command(verbose),
            Commands::Schema { action } => schema_command(&action),
        }
    }
}
