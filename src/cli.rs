// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pillbox",
    about = "Render [Action] and @mention references in chat text as pills",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).  RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tokenize TEXT and print it with references drawn as pills
    Render {
        text: String,
        /// Print the segment list as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Replace known [Action] references in TEXT with their expansion
    Expand { text: String },
    /// List commands matching QUERY (all commands when omitted), sorted by name
    Commands {
        #[arg(default_value = "")]
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compose a message interactively; type the trigger character to pick an action
    Compose,
    /// Print the effective configuration
    ShowConfig,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
