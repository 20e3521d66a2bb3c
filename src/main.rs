// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use pillbox_config::Config;
use pillbox_core::{expand_actions, filter, tokenize, CommandRegistry};
use pillbox_tui::{render, Composer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let config = pillbox_config::load(cli.config.as_deref())?;
    let registry = Arc::new(CommandRegistry::with_builtins());
    debug!(commands = registry.len(), "command registry ready");

    match cli.command {
        Commands::Render { text, json } => render_cmd(&text, json, &registry, &config),
        Commands::Expand { text } => {
            println!("{}", expand_actions(&text, &registry));
            Ok(())
        }
        Commands::Commands { query, json } => commands_cmd(&query, json, &registry),
        Commands::Compose => compose_cmd(registry, config).await,
        Commands::ShowConfig => {
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn render_cmd(
    text: &str,
    json: bool,
    registry: &CommandRegistry,
    config: &Config,
) -> anyhow::Result<()> {
    let segments = tokenize(text, registry);
    if json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    } else {
        println!("{}", render::to_ansi(&segments, &config.render));
    }
    Ok(())
}

fn commands_cmd(query: &str, json: bool, registry: &CommandRegistry) -> anyhow::Result<()> {
    let candidates = filter(registry.all(), query);
    if json {
        let list: Vec<&pillbox_core::Command> = candidates.iter().map(|c| c.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }
    if candidates.is_empty() {
        eprintln!("No commands found");
        return Ok(());
    }
    let width = candidates.iter().map(|c| c.name().len()).max().unwrap_or(0);
    for cmd in &candidates {
        println!("{:<width$}  {}", cmd.name(), cmd.description());
    }
    Ok(())
}

async fn compose_cmd(registry: Arc<CommandRegistry>, config: Config) -> anyhow::Result<()> {
    let composer = Composer::new(registry.clone(), config);
    if let Some(message) = composer.run().await? {
        println!("{}", expand_actions(&message, &registry));
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
